// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monitoring configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ZoneConfig;

/// Default poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default pulse duration.
pub const DEFAULT_PULSE_DURATION: Duration = Duration::from_secs(2);

/// What to monitor and how often.
///
/// Durations are (de)serialized as whole milliseconds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use alarmpanel_lib::monitor::MonitorConfig;
/// use alarmpanel_lib::types::{ZoneConfig, ZoneNumber};
///
/// let config = MonitorConfig::new(1)
///     .with_poll_interval(Duration::from_secs(5))
///     .with_door_zone(ZoneConfig::new(ZoneNumber::new(4)?));
///
/// assert_eq!(config.area_index, 1);
/// assert!(config.door_zone.is_some());
/// # Ok::<(), alarmpanel_lib::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Area whose arming mode is tracked.
    pub area_index: u8,

    /// Delay between the end of one poll and the start of the next.
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,

    /// Zone tracked as the door contact, if any.
    pub door_zone: Option<ZoneConfig>,

    /// Time a pulse stays active.
    #[serde(rename = "pulse_duration_ms", with = "millis")]
    pub pulse_duration: Duration,
}

impl MonitorConfig {
    /// Creates a configuration for `area_index` with default timings.
    #[must_use]
    pub fn new(area_index: u8) -> Self {
        Self {
            area_index,
            ..Self::default()
        }
    }

    /// Sets the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the door zone.
    #[must_use]
    pub fn with_door_zone(mut self, zone: ZoneConfig) -> Self {
        self.door_zone = Some(zone);
        self
    }

    /// Sets the pulse duration.
    #[must_use]
    pub fn with_pulse_duration(mut self, duration: Duration) -> Self {
        self.pulse_duration = duration;
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            area_index: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
            door_zone: None,
            pulse_duration: DEFAULT_PULSE_DURATION,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
