//! Side cache for denormalized channel metadata.

use moka::sync::Cache;

use crate::api::{ChannelInfoSink, SinkError};
use crate::constants::DEFAULT_MAX_CHANNEL_INFOS;
use crate::conversation::{ChannelIdentity, ChannelInfo};

/// Write-through store for channel info that arrives with conversation pages,
/// so other surfaces can resolve names and avatars without another lookup.
#[derive(Clone)]
pub struct ChannelInfoStore {
    infos: Cache<ChannelIdentity, ChannelInfo>,
}

impl Default for ChannelInfoStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHANNEL_INFOS)
    }
}

impl ChannelInfoStore {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            infos: Cache::builder().max_capacity(max_capacity).build(),
        }
    }

    pub fn get(&self, identity: &ChannelIdentity) -> Option<ChannelInfo> {
        self.infos.get(identity)
    }
}

impl ChannelInfoSink for ChannelInfoStore {
    fn store(&self, infos: Vec<ChannelInfo>) -> Result<(), SinkError> {
        for info in infos {
            self.infos.insert(info.identity.clone(), info);
        }
        Ok(())
    }
}
