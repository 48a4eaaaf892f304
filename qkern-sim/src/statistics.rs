//! Execution statistics tracking

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Execution statistics for a sampling run
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExecutionStatistics {
    /// Total wall time of the call
    pub total_time: Duration,

    /// Shots requested
    pub shots: usize,

    /// Shots that ended in a recoverable error
    pub failed_shots: usize,

    /// Whether shots were distributed over the rayon pool
    pub parallel: bool,

    /// Worker threads available to the run
    pub threads: usize,

    /// Qubits in the register
    pub num_qubits: usize,

    /// Unitary operations in the circuit, counting both branch arms
    pub gates_per_shot: usize,
}

impl ExecutionStatistics {
    /// Create a new statistics object
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful shots per second of wall time
    pub fn shots_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            (self.shots - self.failed_shots) as f64 / secs
        }
    }

    /// Fraction of shots that failed
    pub fn failure_rate(&self) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.failed_shots as f64 / self.shots as f64
        }
    }

    /// Amplitude memory of one shot in bytes
    pub fn state_memory_bytes(&self) -> usize {
        (1usize << self.num_qubits) * std::mem::size_of::<num_complex::Complex64>()
    }

    /// Amplitude memory of one shot in MB
    pub fn state_memory_mb(&self) -> f64 {
        self.state_memory_bytes() as f64 / 1_000_000.0
    }
}

impl std::fmt::Display for ExecutionStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Execution Statistics:")?;
        writeln!(f, "  Total time: {:?}", self.total_time)?;
        writeln!(
            f,
            "  Shots: {} ({} failed, {:.1}%)",
            self.shots,
            self.failed_shots,
            self.failure_rate() * 100.0
        )?;
        writeln!(f, "  Throughput: {:.0} shots/sec", self.shots_per_second())?;
        writeln!(
            f,
            "  Mode: {} on {} threads",
            if self.parallel { "parallel" } else { "sequential" },
            self.threads
        )?;

        writeln!(f, "\n  Circuit:")?;
        writeln!(f, "    Qubits: {}", self.num_qubits)?;
        writeln!(f, "    Gates per shot: {}", self.gates_per_shot)?;
        writeln!(f, "    State memory: {:.2} MB", self.state_memory_mb())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shots_per_second() {
        let stats = ExecutionStatistics {
            shots: 1000,
            failed_shots: 0,
            total_time: Duration::from_millis(100),
            ..Default::default()
        };

        assert!((stats.shots_per_second() - 10000.0).abs() < 1.0);
    }

    #[test]
    fn test_failure_rate() {
        let stats = ExecutionStatistics {
            shots: 200,
            failed_shots: 50,
            ..Default::default()
        };

        assert!((stats.failure_rate() - 0.25).abs() < 1e-12);
        assert_eq!(ExecutionStatistics::new().failure_rate(), 0.0);
    }

    #[test]
    fn test_state_memory() {
        let stats = ExecutionStatistics {
            num_qubits: 20,
            ..Default::default()
        };

        assert_eq!(stats.state_memory_bytes(), 16 << 20);
        assert!((stats.state_memory_mb() - 16.777216).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        let text = ExecutionStatistics {
            shots: 10,
            num_qubits: 2,
            ..Default::default()
        }
        .to_string();
        assert!(text.contains("Shots: 10 (0 failed"));
        assert!(text.contains("Qubits: 2"));
    }
}
