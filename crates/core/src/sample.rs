use serde::{Deserialize, Serialize};

/// The tracked metrics, in the fixed order series are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Memory,
    Cpu,
    Read,
    Write,
}

impl Metric {
    pub const COUNT: usize = 4;

    /// Every metric in display order.  Index `i` of this array is series `i`.
    pub const ALL: [Metric; Self::COUNT] = [Metric::Memory, Metric::Cpu, Metric::Read, Metric::Write];

    /// Position of this metric in [`Metric::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Metric::Memory => 0,
            Metric::Cpu    => 1,
            Metric::Read   => 2,
            Metric::Write  => 3,
        }
    }

    /// Field name used in the wire payload and config tables.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Metric::Memory => "memory",
            Metric::Cpu    => "cpu",
            Metric::Read   => "read",
            Metric::Write  => "write",
        }
    }
}

/// One aligned reading of every metric at a single logical instant.
///
/// This is also the JSON wire shape: `{"memory":…,"cpu":…,"read":…,"write":…}`.
/// Unknown fields are ignored; all four fields are required.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// Resident memory in KB.
    pub memory: f64,
    /// CPU usage in percent.
    pub cpu: f64,
    /// Bytes read since the previous sample.
    pub read: f64,
    /// Bytes written since the previous sample.
    pub write: f64,
}

impl Sample {
    /// Filler tick pushed while the source is disconnected.
    pub const ZERO: Self = Self { memory: 0.0, cpu: 0.0, read: 0.0, write: 0.0 };

    /// Value recorded for `metric`.
    #[must_use]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Memory => self.memory,
            Metric::Cpu    => self.cpu,
            Metric::Read   => self.read,
            Metric::Write  => self.write,
        }
    }

    /// `true` when every field is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        Metric::ALL.iter().all(|&m| self.get(m) == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_index_matches_all_order() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
    }

    #[test]
    fn zero_detection_needs_every_field() {
        assert!(Sample::ZERO.is_zero());
        assert!(!Sample { write: 1.0, ..Sample::ZERO }.is_zero());
        assert!(!Sample { cpu: -0.5, ..Sample::ZERO }.is_zero());
    }

    #[test]
    fn deserializes_wire_payload_ignoring_extra_fields() {
        let sample: Sample =
            serde_json::from_str(r#"{"memory":1024,"cpu":12.5,"read":0,"write":7,"pid":42}"#)
                .unwrap();
        assert_eq!(sample.get(Metric::Memory), 1024.0);
        assert_eq!(sample.get(Metric::Cpu), 12.5);
        assert_eq!(sample.get(Metric::Write), 7.0);
    }

    #[test]
    fn rejects_payload_missing_a_field() {
        let parsed = serde_json::from_str::<Sample>(r#"{"memory":1,"cpu":2,"read":3}"#);
        assert!(parsed.is_err());
    }
}
