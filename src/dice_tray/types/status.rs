//! Status read-out for the tray
//!
//! The status panel is rebuilt from per-die snapshots each frame; the
//! formatting lives here so it can be tested without a running app.

use super::die::DieState;

/// What the table as a whole is doing, used to pick the instruction line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TablePhase {
    Gathering,
    Rolling,
    Floating,
    Resolved,
}

impl TablePhase {
    pub fn instructions(&self) -> &'static str {
        match self {
            TablePhase::Gathering => "Aim, then release to throw the gathered dice",
            TablePhase::Rolling => "Rolling...",
            TablePhase::Floating => "Drag anywhere to gather the floating dice, release to throw",
            TablePhase::Resolved => "Click dice to keep them, then Roll Unselected",
        }
    }
}

/// One die as seen by the status panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DieSnapshot {
    pub state: DieState,
    pub selected: bool,
    /// Up-facing value, only meaningful once the die has settled
    pub value: Option<u32>,
}

impl DieSnapshot {
    pub fn new(state: DieState, selected: bool, value: u32) -> Self {
        let value = (state == DieState::Settled).then_some(value);
        Self {
            state,
            selected,
            value,
        }
    }
}

pub fn table_phase(snapshots: &[DieSnapshot], gathering: bool) -> TablePhase {
    if gathering {
        TablePhase::Gathering
    } else if snapshots.iter().any(|s| s.state == DieState::Rolling) {
        TablePhase::Rolling
    } else if snapshots
        .iter()
        .any(|s| matches!(s.state, DieState::Floating | DieState::Dragging))
    {
        TablePhase::Floating
    } else {
        TablePhase::Resolved
    }
}

/// Build the status panel text.
pub fn describe_table(snapshots: &[DieSnapshot], gathering: bool) -> String {
    let kept: Vec<u32> = snapshots
        .iter()
        .filter(|s| s.selected)
        .filter_map(|s| s.value)
        .collect();
    let available: Vec<u32> = snapshots
        .iter()
        .filter(|s| !s.selected)
        .filter_map(|s| s.value)
        .collect();
    let floating = snapshots
        .iter()
        .filter(|s| matches!(s.state, DieState::Floating | DieState::Dragging))
        .count();
    let rolling = snapshots
        .iter()
        .filter(|s| s.state == DieState::Rolling)
        .count();

    let mut text = String::new();

    let all: Vec<u32> = snapshots.iter().filter_map(|s| s.value).collect();
    if all.is_empty() {
        text.push_str("Dice: -\n");
    } else {
        let total: u32 = all.iter().sum();
        text.push_str(&format!("Dice: {} (total {})\n", join_values(&all), total));
    }

    if !kept.is_empty() {
        let total: u32 = kept.iter().sum();
        text.push_str(&format!("Kept: {} (total {})\n", join_values(&kept), total));
    }
    if !available.is_empty() {
        text.push_str(&format!("Available: {}\n", join_values(&available)));
    }
    if floating > 0 {
        text.push_str(&format!("Floating: {}\n", floating));
    }
    if rolling > 0 {
        text.push_str(&format!("Rolling: {}\n", rolling));
    }

    text.push_str(table_phase(snapshots, gathering).instructions());
    text
}

fn join_values(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(value: u32, selected: bool) -> DieSnapshot {
        DieSnapshot::new(DieState::Settled, selected, value)
    }

    #[test]
    fn test_snapshot_hides_value_until_settled() {
        assert_eq!(DieSnapshot::new(DieState::Rolling, false, 4).value, None);
        assert_eq!(DieSnapshot::new(DieState::Floating, false, 4).value, None);
        assert_eq!(DieSnapshot::new(DieState::Settled, false, 4).value, Some(4));
    }

    #[test]
    fn test_phase_priority() {
        let floating = DieSnapshot::new(DieState::Floating, false, 1);
        let rolling = DieSnapshot::new(DieState::Rolling, false, 1);

        assert_eq!(table_phase(&[floating], true), TablePhase::Gathering);
        assert_eq!(table_phase(&[floating, rolling], false), TablePhase::Rolling);
        assert_eq!(table_phase(&[floating, settled(2, false)], false), TablePhase::Floating);
        assert_eq!(table_phase(&[settled(2, false)], false), TablePhase::Resolved);
        assert_eq!(table_phase(&[], false), TablePhase::Resolved);
    }

    #[test]
    fn test_all_floating_text() {
        let snapshots = vec![DieSnapshot::new(DieState::Floating, false, 3); 6];
        let text = describe_table(&snapshots, false);
        assert!(text.starts_with("Dice: -\n"));
        assert!(text.contains("Floating: 6"));
        assert!(text.ends_with(TablePhase::Floating.instructions()));
    }

    #[test]
    fn test_kept_and_available_text() {
        let snapshots = [settled(6, true), settled(2, false), settled(5, true)];
        let text = describe_table(&snapshots, false);
        assert!(text.contains("Dice: 6, 2, 5 (total 13)"));
        assert!(text.contains("Kept: 6, 5 (total 11)"));
        assert!(text.contains("Available: 2"));
        assert!(text.ends_with(TablePhase::Resolved.instructions()));
    }
}
