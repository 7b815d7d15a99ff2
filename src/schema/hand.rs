//! Hand landmark definitions.
//!
//! The extractor reports 21 joints per hand in a fixed order, wrist first,
//! then four joints per finger from thumb to pinky. Each joint carries
//! (x, y, z) coordinates.

use serde::{Deserialize, Serialize};

/// A tracked hand joint, in extractor output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    /// Number of joints reported per hand.
    pub const COUNT: usize = 21;

    /// All joints in extractor output order.
    pub fn all() -> &'static [HandLandmark; Self::COUNT] {
        use HandLandmark::*;
        &[
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyMcp,
            PinkyPip,
            PinkyDip,
            PinkyTip,
        ]
    }

    /// Position of this joint in the extractor output.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a joint by its output position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Snake-case name used in exported feature names.
    pub fn name(self) -> &'static str {
        use HandLandmark::*;
        match self {
            Wrist => "wrist",
            ThumbCmc => "thumb_cmc",
            ThumbMcp => "thumb_mcp",
            ThumbIp => "thumb_ip",
            ThumbTip => "thumb_tip",
            IndexFingerMcp => "index_finger_mcp",
            IndexFingerPip => "index_finger_pip",
            IndexFingerDip => "index_finger_dip",
            IndexFingerTip => "index_finger_tip",
            MiddleFingerMcp => "middle_finger_mcp",
            MiddleFingerPip => "middle_finger_pip",
            MiddleFingerDip => "middle_finger_dip",
            MiddleFingerTip => "middle_finger_tip",
            RingFingerMcp => "ring_finger_mcp",
            RingFingerPip => "ring_finger_pip",
            RingFingerDip => "ring_finger_dip",
            RingFingerTip => "ring_finger_tip",
            PinkyMcp => "pinky_mcp",
            PinkyPip => "pinky_pip",
            PinkyDip => "pinky_dip",
            PinkyTip => "pinky_tip",
        }
    }
}

/// Spatial coordinate of a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Coordinates per landmark.
    pub const COUNT: usize = 3;

    pub fn all() -> &'static [Axis; Self::COUNT] {
        &[Axis::X, Axis::Y, Axis::Z]
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}
