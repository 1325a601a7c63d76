//! Generation-stamped open/closed membership.

/// Tracks whether each node index is unvisited, open or closed.
///
/// Each slot stores a stamp; a slot is open when its stamp equals the
/// current marker and closed when it equals `marker + 1`. [`clear`](Self::clear)
/// bumps the marker instead of rewriting the array, so resetting between
/// searches is O(1). The array is only rewritten when the marker is about to
/// overflow.
#[derive(Debug, Clone)]
pub struct OpenClosed {
    list: Vec<u32>,
    marker: u32,
}

impl OpenClosed {
    /// A set covering indices `0..capacity`, with every index unvisited.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: vec![0; capacity],
            marker: 1,
        }
    }

    /// Mark every index unvisited.
    pub fn clear(&mut self) {
        if u32::MAX - 2 <= self.marker {
            self.list.fill(0);
            self.marker = 1;
        } else {
            self.marker += 2;
        }
    }

    #[inline]
    pub fn is_open(&self, index: usize) -> bool {
        self.list[index] == self.marker
    }

    #[inline]
    pub fn is_closed(&self, index: usize) -> bool {
        self.list[index] == self.marker + 1
    }

    #[inline]
    pub fn open(&mut self, index: usize) {
        self.list[index] = self.marker;
    }

    #[inline]
    pub fn close(&mut self, index: usize) {
        self.list[index] = self.marker + 1;
    }

    pub fn capacity(&self) -> usize {
        self.list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close() {
        let mut oc = OpenClosed::new(10);
        assert!(!oc.is_open(3) && !oc.is_closed(3));
        oc.open(3);
        assert!(oc.is_open(3) && !oc.is_closed(3));
        oc.close(3);
        assert!(!oc.is_open(3) && oc.is_closed(3));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut oc = OpenClosed::new(10);
        oc.open(1);
        oc.close(2);
        oc.clear();
        for i in 0..10 {
            assert!(!oc.is_open(i));
            assert!(!oc.is_closed(i));
        }
    }

    #[test]
    fn stale_closed_stamp_never_reads_as_open() {
        // A slot closed in one generation holds marker + 1; after a clear that
        // value is below the new marker and must not read as open.
        let mut oc = OpenClosed::new(4);
        oc.close(0);
        oc.clear();
        assert!(!oc.is_open(0));
        assert!(!oc.is_closed(0));
    }

    #[test]
    fn marker_wrap_rewrites_array() {
        let mut oc = OpenClosed::new(4);
        oc.marker = u32::MAX - 3;
        oc.open(0);
        oc.close(1);
        oc.clear();
        assert_eq!(oc.marker, u32::MAX - 1);
        assert!(!oc.is_open(0) && !oc.is_closed(1));
        oc.close(2);
        assert!(oc.is_closed(2));
        oc.clear();
        assert_eq!(oc.marker, 1);
        assert!(oc.list.iter().all(|&s| s == 0));
        assert!(!oc.is_open(0) && !oc.is_closed(1));
        assert_eq!(oc.capacity(), 4);
    }
}
