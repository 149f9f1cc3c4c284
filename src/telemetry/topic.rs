use std::fmt;

/// The closed set of broker topics carrying drone telemetry.
///
/// The subscription set is fixed at compile time; there is no dynamic topic
/// discovery. `name` and `from_name` map between the enum and the topic
/// strings used on the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    TempHumidity,
    Accelerometer,
    Gps,
}

impl Topic {
    /// Every topic the bridge subscribes to, in subscription order.
    pub const ALL: [Topic; 3] = [Topic::TempHumidity, Topic::Accelerometer, Topic::Gps];

    /// The topic string as it appears on the broker.
    pub fn name(self) -> &'static str {
        match self {
            Topic::TempHumidity => "dronesense/temp-humidity",
            Topic::Accelerometer => "dronesense/accelerometer",
            Topic::Gps => "dronesense/gps",
        }
    }

    /// Maps a broker topic string back to the enum.
    ///
    /// Returns `None` for anything outside the fixed set; callers drop such
    /// messages rather than guessing at a schema.
    pub fn from_name(name: &str) -> Option<Self> {
        Topic::ALL.into_iter().find(|topic| topic.name() == name)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
