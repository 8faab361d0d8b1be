//! Slice layout of the weighted ring.
//!
//! The signed 32-bit hash space is cut into an even number of equally sized
//! slices. Slice `half` starts at zero, so negative positions land in the
//! lower half and non-negative ones in the upper half. Inside one slice every
//! position has the same sign, which makes unsigned and signed ordering agree.

/// Replicas per slice at the configured density.
pub const REPLICAS_PER_SLICE: u64 = 8;

/// Default base replica count per backend.
pub const DEFAULT_REPLICAS: u32 = 256;

const HASH_SPACE_HALF: i64 = 1 << 31;

/// Geometry of the sliced ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceLayout {
    count: usize,
    half: i64,
    div: i64,
}

impl SliceLayout {
    /// Layout for a ring holding `total_replicas` replica positions.
    ///
    /// The slice count is `total_replicas / 8`, raised to the next even
    /// number (and to at least 2).
    pub fn new(total_replicas: u64) -> Self {
        let mut count = (total_replicas / REPLICAS_PER_SLICE).max(2);
        if count % 2 == 1 {
            count += 1;
        }
        let half = (count / 2) as i64;
        // Ceiling division keeps i32::MAX inside the last slice.
        let div = (HASH_SPACE_HALF + half - 1) / half;
        Self {
            count: count as usize,
            half,
            div,
        }
    }

    /// Number of slices.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Offset added to the signed bucket index.
    pub fn half(&self) -> usize {
        self.half as usize
    }

    /// Width of one slice in hash units.
    pub fn div(&self) -> i64 {
        self.div
    }

    /// Slice owning the signed position `position`.
    #[inline]
    pub fn slice_for(&self, position: i32) -> usize {
        (i64::from(position).div_euclid(self.div) + self.half) as usize
    }
}

/// Round a caller-supplied base replica count to the nearest multiple of 8.
///
/// Values that would round to zero are raised to 8. Zero itself is rejected
/// by the builder before this is called.
pub fn normalize_replicas(replicas: u32) -> u32 {
    let slices = (u64::from(replicas) + REPLICAS_PER_SLICE / 2) / REPLICAS_PER_SLICE;
    (slices.max(1) * REPLICAS_PER_SLICE).min(u64::from(u32::MAX) / 8 * 8) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        // Two backends at 256 replicas each.
        let layout = SliceLayout::new(512);
        assert_eq!(layout.count(), 64);
        assert_eq!(layout.half(), 32);
        assert_eq!(layout.div(), 67_108_864);
    }

    #[test]
    fn test_slice_edges() {
        let layout = SliceLayout::new(512);
        assert_eq!(layout.slice_for(i32::MIN), 0);
        assert_eq!(layout.slice_for(-1), 31);
        assert_eq!(layout.slice_for(0), 32);
        assert_eq!(layout.slice_for(i32::MAX), 63);
        assert_eq!(layout.slice_for(67_108_864), 33);
        assert_eq!(layout.slice_for(67_108_863), 32);
    }

    #[test]
    fn test_odd_slice_count_made_even() {
        // 3 backends at 8 replicas each: 24 / 8 = 3 slices, bumped to 4.
        let layout = SliceLayout::new(24);
        assert_eq!(layout.count(), 4);
        assert_eq!(layout.half(), 2);
        assert_eq!(layout.div(), 1 << 30);
        assert_eq!(layout.slice_for(i32::MIN), 0);
        assert_eq!(layout.slice_for(i32::MAX), 3);
    }

    #[test]
    fn test_non_power_of_two_half_stays_in_range() {
        // 48 / 8 = 6 slices, half = 3: 2^31 is not divisible by 3.
        let layout = SliceLayout::new(48);
        assert_eq!(layout.count(), 6);
        assert_eq!(layout.slice_for(i32::MIN), 0);
        assert_eq!(layout.slice_for(-1), 2);
        assert_eq!(layout.slice_for(0), 3);
        assert_eq!(layout.slice_for(i32::MAX), 5);
    }

    #[test]
    fn test_every_position_maps_into_range() {
        let layout = SliceLayout::new(40);
        for position in [i32::MIN, i32::MIN + 1, -12345, 0, 1, 99_999, i32::MAX] {
            assert!(layout.slice_for(position) < layout.count());
        }
    }

    #[test]
    fn test_normalize_replicas() {
        assert_eq!(normalize_replicas(256), 256);
        assert_eq!(normalize_replicas(250), 248);
        assert_eq!(normalize_replicas(252), 256);
        assert_eq!(normalize_replicas(100), 104);
        assert_eq!(normalize_replicas(3), 8);
        assert_eq!(normalize_replicas(1), 8);
    }
}
