use super::base::BaseManager;
use crate::config::ManagerOptions;
use crate::core::{IdentityComparator, Result, TagData};
use crate::service::FullListService;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{debug, warn};

/// Unpaged manager for small lookup sets: one fetch replaces the whole list.
pub struct FullListManager<T, S: ?Sized> {
    base: BaseManager<T, S>,
}

impl<T, S> FullListManager<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: FullListService<T> + ?Sized,
{
    pub fn new(
        service: Arc<S>,
        identity: impl Into<IdentityComparator<T>>,
        options: ManagerOptions<T>,
    ) -> Self {
        Self {
            base: BaseManager::new(service, identity, options),
        }
    }

    /// Loads every record in the manager's tag-data scope.
    pub async fn load_data(&mut self) -> Result<()> {
        let params = self.base.tag_data().cloned();
        self.load_data_with(params.as_ref()).await
    }

    /// Loads every record matching `params`, ignoring the tag data.
    pub async fn load_data_with(&mut self, params: Option<&TagData>) -> Result<()> {
        let list = match self.base.service().get_list(params).await {
            Ok(list) => list,
            Err(err) => {
                warn!(error = %err, "remote list fetch failed");
                return Err(err);
            }
        };
        debug!(len = list.len(), "full list loaded");
        self.base.set_list(list);
        Ok(())
    }
}

impl<T, S: ?Sized> Deref for FullListManager<T, S> {
    type Target = BaseManager<T, S>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl<T, S: ?Sized> DerefMut for FullListManager<T, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}
