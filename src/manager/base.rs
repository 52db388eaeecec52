use crate::cache::LocalListCache;
use crate::config::{ConvertFn, ManagerOptions};
use crate::core::{IdentityComparator, Result, TagData};
use crate::service::RecordService;
use std::sync::Arc;
use tracing::{debug, warn};

/// Local list bound to a remote record service.
///
/// Every mutation calls the service first and touches the local list only after
/// the call succeeded, so a failed call leaves the list exactly as it was.
pub struct BaseManager<T, S: ?Sized> {
    service: Arc<S>,
    cache: LocalListCache<T>,
    convert: Option<ConvertFn<T>>,
    from_top: bool,
    tag_data: Option<TagData>,
}

impl<T, S> BaseManager<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: RecordService<T> + ?Sized,
{
    pub fn new(
        service: Arc<S>,
        identity: impl Into<IdentityComparator<T>>,
        options: ManagerOptions<T>,
    ) -> Self {
        Self {
            service,
            cache: LocalListCache::new(identity.into()),
            convert: options.convert,
            from_top: options.from_top,
            tag_data: options.tag_data,
        }
    }

    /// Persists `data` and mirrors the saved record locally.
    ///
    /// New records are inserted at the configured edge; existing ones replace the
    /// record with the same identity in place.
    pub async fn save(&mut self, data: T, is_new: bool) -> Result<()> {
        let saved = match self.service.save(data, is_new).await {
            Ok(saved) => saved,
            Err(err) => {
                warn!(is_new, error = %err, "remote save failed");
                return Err(err);
            }
        };
        let item = match &self.convert {
            Some(convert) => convert(saved, is_new),
            None => saved,
        };

        if is_new {
            self.append(item);
        } else {
            self.replace(item);
        }
        debug!(is_new, len = self.cache.len(), "record saved");
        Ok(())
    }

    /// Deletes `item` remotely, then drops the local record with the same identity.
    pub async fn remove(&mut self, item: &T) -> Result<()> {
        if let Err(err) = self.service.remove(item).await {
            warn!(error = %err, "remote remove failed");
            return Err(err);
        }
        self.remove_item(item);
        debug!(len = self.cache.len(), "record removed");
        Ok(())
    }

    /// Detached copy of the current list.
    pub fn list(&self) -> Vec<T> {
        self.cache.snapshot()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Local record with the same identity as `item`, if loaded.
    pub fn find(&self, item: &T) -> Option<&T> {
        self.cache.find(item)
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub fn tag_data(&self) -> Option<&TagData> {
        self.tag_data.as_ref()
    }

    pub fn identity(&self) -> &IdentityComparator<T> {
        self.cache.identity()
    }

    pub fn from_top(&self) -> bool {
        self.from_top
    }

    pub(crate) fn cache_mut(&mut self) -> &mut LocalListCache<T> {
        &mut self.cache
    }

    pub(crate) fn remove_item(&mut self, item: &T) {
        if !self.cache.remove_by_identity(item) {
            debug!("remove target not loaded locally; list unchanged");
        }
    }

    pub(crate) fn replace(&mut self, item: T) {
        if !self.cache.replace_by_identity(item) {
            debug!("replace target not loaded locally; list unchanged");
        }
    }

    pub(crate) fn append(&mut self, item: T) {
        self.cache.insert_at_edge(item, self.from_top);
    }

    pub(crate) fn set_list(&mut self, items: Vec<T>) {
        self.cache.replace_all(items);
    }
}
