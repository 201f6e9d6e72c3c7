//! Selection engine tuning knobs.

/// Tuning for one tracker's selection behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Seconds a sensor keeps favoring (and then coasting on) a lost or
    /// re-acquirable target before giving up and returning home.  Reset to
    /// this value every tick the lock is confirmed.
    pub lock_hold_secs: f64,

    /// IFF codes treated as friendly.  Detections squawking any of these are
    /// excluded from selection.  Empty disables the filter — the default, so
    /// a bare tracker illuminates everything it sees.
    pub friendly_codes: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            lock_hold_secs: 5.0,
            friendly_codes: Vec::new(),
        }
    }
}

impl TrackerConfig {
    /// Is the friendly filter active?
    #[inline]
    pub fn filters_friendlies(&self) -> bool {
        !self.friendly_codes.is_empty()
    }
}
