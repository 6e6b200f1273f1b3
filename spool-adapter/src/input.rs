/// A scroll gesture event, already projected onto the list's vertical axis.
///
/// Touch coordinates are in the list's content space. A finger moving down (growing `y`) drags
/// the content down and reveals items above.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollInput {
    /// Wheel rotation in notches. Positive reveals items above.
    Wheel { notches: f64 },
    TouchDown { y: i32 },
    TouchMove { y: i32 },
    TouchUp { y: i32 },
}
