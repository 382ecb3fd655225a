use super::{cell, DoubleArray};
use crate::traits::fixed_int::FixedInt;
use crate::Result;
use num_traits::{PrimInt, Signed, Unsigned};

impl<I, K, const N: usize> DoubleArray<I, K, N>
where
    I: PrimInt + Signed + FixedInt<N>,
    K: PrimInt + Unsigned,
{
    /// Grafts the missing tail of `key` below `index`.
    ///
    /// `pos` is the 1-based position of the first symbol without an edge and
    /// `n` the amount of symbols before the terminal. Relocates `index`'s
    /// family first when the wanted slot is owned by another state, then lays
    /// down one fresh state per remaining symbol and marks the last one as
    /// the accepting leaf.
    pub(super) fn insert(&mut self, mut index: I, mut pos: usize, key: &[K], n: usize) -> Result<()> {
        let c = key[pos - 1];
        let t = self.target(index, c);
        if t <= self.da_size() && self.check.get(cell(t)) > I::zero() {
            // the slot is owned by another family; move ours out of the way
            self.modify(index, c)?;
        }

        let t = self.target(index, c);
        self.w_check(t, index)?;
        index = t;
        pos += 1;

        while pos <= n + 1 {
            let c = key[pos - 1];
            let new_base = self.x_check(&[c]);
            self.w_base(index, new_base)?;

            let t = self.target(index, c);
            self.w_check(t, index)?;
            index = t;
            pos += 1;
        }

        // negative BASE marks the accepting leaf
        self.w_base(index, -I::one())
    }

    /// Relocates the whole child family of `index` to a base where symbol
    /// `fresh` fits next to the existing children.
    ///
    /// Children keep their BASE, so their own families stay in place; only
    /// grandchild CHECK cells have to follow the moved parent. Grandchildren
    /// of a child can live nowhere but in `[base + 1, base + max]` of that
    /// child, which bounds the rewrite scan.
    fn modify(&mut self, index: I, fresh: K) -> Result<()> {
        let labels = self.labels_of(index);
        let mut wanted = labels.clone();
        if !wanted.contains(&fresh) {
            wanted.push(fresh);
        }

        let old_base = self.base.get(cell(index));
        // allocated before any old slot is blanked, so the two families
        // cannot overlap
        let new_base = self.x_check(&wanted);

        for c in labels {
            let old_t = old_base + Self::sym(c);
            let new_t = new_base + Self::sym(c);
            let child_base = self.base.get(cell(old_t));

            self.w_check(new_t, index)?;
            self.w_base(new_t, child_base)?;

            if child_base > I::zero() {
                let mut q = child_base + I::one();
                let end = child_base + Self::sym(self.max);
                while q <= end && q <= self.da_size() {
                    if self.check.get(cell(q)) == old_t {
                        self.w_check(q, new_t)?;
                    }
                    q = q + I::one();
                }
            }

            self.w_base(old_t, I::zero())?;
            self.w_check(old_t, I::zero())?;
        }

        self.w_base(index, new_base)
    }
}

#[cfg(test)]
mod test {
    use super::super::presets::ByteDoubleArray;
    use super::super::{cell, DoubleArray};

    const TERM: u8 = 27;

    fn open_da(dir: &std::path::Path) -> ByteDoubleArray {
        DoubleArray::open(dir.join("base"), dir.join("check"), TERM, 27, true).unwrap()
    }

    #[test]
    fn contended_slot_relocates_the_resident_family() {
        let dir = tempfile::tempdir().unwrap();
        let mut da = open_da(dir.path());

        // "ab#" puts the 'b' child of state `a` exactly where the root's
        // 'b' edge would land
        da.add(&[1, 2, TERM]).unwrap();
        let root_base = da.base.get(1);
        let contended = root_base + 2;
        assert!(da.check.get(cell(contended)) > 1);

        da.add(&[2, TERM]).unwrap();

        assert_ne!(da.base.get(1), root_base);
        assert_ne!(da.search(&[1, 2, TERM]), 0);
        assert_ne!(da.search(&[2, TERM]), 0);
    }

    #[test]
    fn grandchildren_follow_their_parent() {
        let dir = tempfile::tempdir().unwrap();
        let mut da = open_da(dir.path());

        da.add(&[1, 2, TERM]).unwrap();
        da.add(&[1, 3, TERM]).unwrap();
        da.add(&[1, 2, 4, TERM]).unwrap();

        // walk to state `ab`, whose family holds the deep leaves
        let a = da.forward(1, 1);
        let ab = da.forward(a, 2);
        assert!(ab > 0);

        // relocating the root family moves `a`; everything below must follow
        da.add(&[2, TERM]).unwrap();

        let a_moved = da.forward(1, 1);
        assert_ne!(a, a_moved);
        let ab_after = da.forward(a_moved, 2);
        assert_eq!(da.check.get(cell(ab_after)), a_moved);

        for key in [
            &[1, 2, TERM][..],
            &[1, 3, TERM][..],
            &[1, 2, 4, TERM][..],
            &[2, TERM][..],
        ] {
            assert_ne!(da.search(key), 0, "{key:?} lost in relocation");
        }
    }

    #[test]
    fn vacated_slots_are_blank() {
        let dir = tempfile::tempdir().unwrap();
        let mut da = open_da(dir.path());

        da.add(&[1, 2, TERM]).unwrap();
        let old_base = da.base.get(1);
        let old_child = old_base + 1;

        da.add(&[2, TERM]).unwrap();
        assert_ne!(da.base.get(1), old_base);

        // the vacated child slot is blank or back on the free list
        assert!(da.check.get(cell(old_child)) <= 0);
        assert_eq!(da.base.get(cell(old_child)), 0);
    }

    #[test]
    fn sibling_insert_without_contention_keeps_the_base() {
        let dir = tempfile::tempdir().unwrap();
        let mut da = open_da(dir.path());

        da.add(&[3, 1, TERM]).unwrap();
        let a = da.forward(1, 3);
        let a_base = da.base.get(cell(a));

        // a free sibling slot means no relocation
        da.add(&[3, 2, TERM]).unwrap();
        assert_eq!(da.base.get(cell(a)), a_base);
        assert_ne!(da.search(&[3, 1, TERM]), 0);
        assert_ne!(da.search(&[3, 2, TERM]), 0);
    }
}
