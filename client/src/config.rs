use std::default::Default;

/// Contains Config properties which will be used by a MapDownlink
#[derive(Clone, Debug)]
pub struct DownlinkConfig {
    /// Empty the local mirror when the link drops. The observer is told
    /// about the unlink but not about the entries that go with it.
    pub clear_on_unlink: bool,
}

impl Default for DownlinkConfig {
    fn default() -> Self {
        Self {
            clear_on_unlink: true,
        }
    }
}
