use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use crate::error::{KernelError, OperationError};

use super::segment::SegmentId;

slotmap::new_key_type! {
    /// Unique identifier for a wall in the wall graph.
    pub struct WallId;
}

/// Wall category. Each type carries a fixed default thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallType {
    Layout,
    Zone,
    Area,
}

impl WallType {
    pub const ALL: [Self; 3] = [Self::Layout, Self::Zone, Self::Area];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Zone => "zone",
            Self::Area => "area",
        }
    }
}

impl fmt::Display for WallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WallType {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layout" => Ok(Self::Layout),
            "zone" => Ok(Self::Zone),
            "area" => Ok(Self::Area),
            other => Err(OperationError::InvalidInput(format!("unknown wall type '{other}'")).into()),
        }
    }
}

/// A typed collection of segments sharing one thickness.
#[derive(Debug, Clone)]
pub struct WallData {
    pub wall_type: WallType,
    /// Normally the type's thickness; stored separately so it can be fixed up.
    pub thickness: f64,
    pub visible: bool,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
    pub(crate) segments: Vec<SegmentId>,
}

impl WallData {
    pub(crate) fn new(wall_type: WallType, thickness: f64, segments: Vec<SegmentId>) -> Self {
        let now = SystemTime::now();
        Self {
            wall_type,
            thickness,
            visible: true,
            created_at: now,
            updated_at: now,
            segments,
        }
    }

    /// Segments owned by this wall (order carries no meaning).
    #[must_use]
    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }

    /// A wall without segments cannot render or merge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = SystemTime::now();
    }

    pub(crate) fn add_segment(&mut self, segment: SegmentId) {
        if !self.segments.contains(&segment) {
            self.segments.push(segment);
        }
        self.touch();
    }

    pub(crate) fn remove_segment(&mut self, segment: SegmentId) {
        self.segments.retain(|s| *s != segment);
        self.touch();
    }

    /// Swaps `old` for `replacements` in one step.
    pub(crate) fn replace_segment(&mut self, old: SegmentId, replacements: &[SegmentId]) {
        self.segments.retain(|s| *s != old);
        for r in replacements {
            if !self.segments.contains(r) {
                self.segments.push(*r);
            }
        }
        self.touch();
    }
}
