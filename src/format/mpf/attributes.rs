//! MP Individual Attributes directory.
//!
//! Every embedded image carries one of these. Unlike the index directory,
//! fields may appear in any order and are dispatched by tag through the
//! closed [`AttributeTag`] table; an unknown tag invalidates the directory.

use serde::Serialize;
use tracing::trace;

use crate::error::MpoError;
use crate::io::ByteView;

use super::entry::{DirectoryEntry, ENTRY_COUNT_SIZE, ENTRY_SIZE};
use super::header::ByteOrder;
use super::tags::AttributeTag;

/// Decoded MP Individual Attributes directory.
///
/// Each slot holds the entry carrying that tag, if the directory had one.
/// When a tag repeats, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndividualAttributes {
    /// Number of entries declared by the directory
    pub entry_count: u16,

    pub version: Option<DirectoryEntry>,
    pub individual_number: Option<DirectoryEntry>,
    pub pan_orientation: Option<DirectoryEntry>,
    pub pan_overlap_horizontal: Option<DirectoryEntry>,
    pub pan_overlap_vertical: Option<DirectoryEntry>,
    pub base_viewpoint_number: Option<DirectoryEntry>,
    pub convergence_angle: Option<DirectoryEntry>,
    pub baseline_length: Option<DirectoryEntry>,
    pub vertical_divergence: Option<DirectoryEntry>,
    pub axis_distance_x: Option<DirectoryEntry>,
    pub axis_distance_y: Option<DirectoryEntry>,
    pub axis_distance_z: Option<DirectoryEntry>,
    pub yaw_angle: Option<DirectoryEntry>,
    pub pitch_angle: Option<DirectoryEntry>,
    pub roll_angle: Option<DirectoryEntry>,

    /// Offset of the next directory, normally 0
    pub next_ifd_offset: u32,
}

impl IndividualAttributes {
    /// Decode the directory located at `offset`.
    ///
    /// # Errors
    /// - `LimitExceeded` if the entry count is above `max_entries`
    /// - `UnknownAttributeTag` on the first tag outside the closed table
    /// - `OutOfRangeRead` / `UnknownFieldType` from entry decoding
    pub fn parse(
        view: &ByteView<'_>,
        offset: usize,
        origin: usize,
        byte_order: ByteOrder,
        max_entries: u16,
    ) -> Result<Self, MpoError> {
        let entry_count = byte_order.u16_at(view, offset)?;
        if entry_count > max_entries {
            return Err(MpoError::LimitExceeded {
                what: "attribute directory entries",
                limit: max_entries as u64,
                actual: entry_count as u64,
            });
        }

        let mut attrs = IndividualAttributes {
            entry_count,
            ..Default::default()
        };

        for i in 0..entry_count as usize {
            let entry_offset = offset + ENTRY_COUNT_SIZE + ENTRY_SIZE * i;
            let entry = DirectoryEntry::parse(view, entry_offset, origin, byte_order)?;
            let tag =
                AttributeTag::from_u16(entry.tag).ok_or(MpoError::UnknownAttributeTag(entry.tag))?;
            trace!(?tag, count = entry.count, "attribute entry");
            *attrs.slot_mut(tag) = Some(entry);
        }

        let next_offset = offset + ENTRY_COUNT_SIZE + ENTRY_SIZE * entry_count as usize;
        attrs.next_ifd_offset = byte_order.u32_at(view, next_offset)?;

        Ok(attrs)
    }

    fn slot_mut(&mut self, tag: AttributeTag) -> &mut Option<DirectoryEntry> {
        match tag {
            AttributeTag::MpfVersion => &mut self.version,
            AttributeTag::IndividualNumber => &mut self.individual_number,
            AttributeTag::PanOrientation => &mut self.pan_orientation,
            AttributeTag::PanOverlapHorizontal => &mut self.pan_overlap_horizontal,
            AttributeTag::PanOverlapVertical => &mut self.pan_overlap_vertical,
            AttributeTag::BaseViewpointNumber => &mut self.base_viewpoint_number,
            AttributeTag::ConvergenceAngle => &mut self.convergence_angle,
            AttributeTag::BaselineLength => &mut self.baseline_length,
            AttributeTag::VerticalDivergence => &mut self.vertical_divergence,
            AttributeTag::AxisDistanceX => &mut self.axis_distance_x,
            AttributeTag::AxisDistanceY => &mut self.axis_distance_y,
            AttributeTag::AxisDistanceZ => &mut self.axis_distance_z,
            AttributeTag::YawAngle => &mut self.yaw_angle,
            AttributeTag::PitchAngle => &mut self.pitch_angle,
            AttributeTag::RollAngle => &mut self.roll_angle,
        }
    }

    /// Look up the entry for a tag.
    pub fn get(&self, tag: AttributeTag) -> Option<&DirectoryEntry> {
        match tag {
            AttributeTag::MpfVersion => self.version.as_ref(),
            AttributeTag::IndividualNumber => self.individual_number.as_ref(),
            AttributeTag::PanOrientation => self.pan_orientation.as_ref(),
            AttributeTag::PanOverlapHorizontal => self.pan_overlap_horizontal.as_ref(),
            AttributeTag::PanOverlapVertical => self.pan_overlap_vertical.as_ref(),
            AttributeTag::BaseViewpointNumber => self.base_viewpoint_number.as_ref(),
            AttributeTag::ConvergenceAngle => self.convergence_angle.as_ref(),
            AttributeTag::BaselineLength => self.baseline_length.as_ref(),
            AttributeTag::VerticalDivergence => self.vertical_divergence.as_ref(),
            AttributeTag::AxisDistanceX => self.axis_distance_x.as_ref(),
            AttributeTag::AxisDistanceY => self.axis_distance_y.as_ref(),
            AttributeTag::AxisDistanceZ => self.axis_distance_z.as_ref(),
            AttributeTag::YawAngle => self.yaw_angle.as_ref(),
            AttributeTag::PitchAngle => self.pitch_angle.as_ref(),
            AttributeTag::RollAngle => self.roll_angle.as_ref(),
        }
    }

    // -------------------------------------------------------------------------
    // Typed accessors
    // -------------------------------------------------------------------------

    /// MP Individual Image Number (1-based position in a multi-view series).
    pub fn individual_number(&self) -> Option<u32> {
        self.individual_number.as_ref().and_then(DirectoryEntry::as_u32)
    }

    /// Panorama scanning orientation word.
    pub fn pan_orientation(&self) -> Option<u32> {
        self.pan_orientation.as_ref().and_then(DirectoryEntry::as_u32)
    }

    /// Viewpoint number used as the baseline for multi-view images.
    pub fn base_viewpoint_number(&self) -> Option<u32> {
        self.base_viewpoint_number.as_ref().and_then(DirectoryEntry::as_u32)
    }

    /// Convergence angle in degrees.
    pub fn convergence_angle(&self) -> Option<f64> {
        self.float_value(AttributeTag::ConvergenceAngle)
    }

    /// Baseline length in meters.
    pub fn baseline_length(&self) -> Option<f64> {
        self.float_value(AttributeTag::BaselineLength)
    }

    /// `(yaw, pitch, roll)` in degrees; each component independently optional.
    pub fn orientation(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (
            self.float_value(AttributeTag::YawAngle),
            self.float_value(AttributeTag::PitchAngle),
            self.float_value(AttributeTag::RollAngle),
        )
    }

    /// Numeric value of any rational/float attribute.
    pub fn float_value(&self, tag: AttributeTag) -> Option<f64> {
        self.get(tag).and_then(DirectoryEntry::as_f64)
    }
}

// =============================================================================
// Tests
// =============================================================================
