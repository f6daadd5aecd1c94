use std::fmt;

/// Stage of a merge, in the order they happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Loading,
    Metadata,
    Icon,
    Merging,
    Building,
    Generating,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Phase::Loading => "Loading resource packs...",
            Phase::Metadata => "Creating pack metadata...",
            Phase::Icon => "Adding pack icon...",
            Phase::Merging => "Merging resource pack files...",
            Phase::Building => "Building final resource pack...",
            Phase::Generating => "Generating archive...",
            Phase::Complete => "Complete!",
        };
        f.write_str(text)
    }
}

/// Observer for merge progress. `percent` never decreases during a merge.
pub trait Progress: Send + Sync {
    fn report(&self, phase: Phase, percent: u8);
}

impl<F> Progress for F
where
    F: Fn(Phase, u8) + Send + Sync,
{
    fn report(&self, phase: Phase, percent: u8) {
        self(phase, percent)
    }
}

/// Discards all progress reports
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&self, _phase: Phase, _percent: u8) {}
}

/// `start + done/total * span`, as a whole percentage
pub(crate) fn scaled(start: u8, span: u8, done: usize, total: usize) -> u8 {
    if total == 0 {
        return start + span;
    }
    let done = done.min(total);
    start + (span as usize * done / total) as u8
}
