use super::{cell, DoubleArray};
use crate::traits::fixed_int::FixedInt;
use num_traits::{PrimInt, Signed, Unsigned};

/// The least amount of reusable slots before the list gets built.
const ACTIVATION_SLOTS: usize = 3;

impl<I, K, const N: usize> DoubleArray<I, K, N>
where
    I: PrimInt + Signed + FixedInt<N>,
    K: PrimInt + Unsigned,
{
    /// Threads every blank slot into an ascending list headed by `e_head`,
    /// once at least [`ACTIVATION_SLOTS`] of them exist. No-op until then;
    /// once active the list never deactivates.
    ///
    /// Each link stores the negated index of the next free slot, the tail
    /// names the first cell past the in-use region.
    pub(super) fn build_free_list(&mut self) {
        let size = self.da_size();

        let mut slots = Vec::new();
        let mut i = I::one();
        while i <= size {
            if self.check.get(cell(i)) <= I::zero() && self.base.get(cell(i)).is_zero() {
                slots.push(i);
            }
            i = i + I::one();
        }

        if slots.len() < ACTIVATION_SLOTS {
            return;
        }

        for pair in slots.windows(2) {
            self.check.set(cell(pair[0]), -pair[1]);
        }
        self.check.set(cell(slots[slots.len() - 1]), -(size + I::one()));
        self.e_head = slots[0];
    }

    /// Splices blank slot `i` into the list, keeping it ascending. `i` must
    /// not be linked already.
    pub(super) fn link_free(&mut self, i: I) {
        if self.e_head > i {
            self.check.set(cell(i), -self.e_head);
            self.e_head = i;
            return;
        }

        let mut p = self.e_head;
        loop {
            let next = -self.check.get(cell(p));
            debug_assert!(next > p, "free list not ascending");
            if next > i {
                self.check.set(cell(p), -i);
                self.check.set(cell(i), -next);
                return;
            }
            p = next;
        }
    }

    /// Splices slot `i`, currently linked as free, out of the list.
    pub(super) fn unlink_free(&mut self, i: I) {
        let next = -self.check.get(cell(i));
        if self.e_head == i {
            self.e_head = next;
            return;
        }

        let mut p = self.e_head;
        loop {
            let succ = -self.check.get(cell(p));
            debug_assert!(succ > p, "free list not ascending");
            if succ == i {
                self.check.set(cell(p), -next);
                return;
            }
            p = succ;
        }
    }

    /// Smallest `q >= 1` that puts `q + c` on a free slot for every `c` in
    /// `symbols`. Minimality keeps the layout reproducible and is what the
    /// relocation engine assumes.
    pub(super) fn x_check(&self, symbols: &[K]) -> I {
        assert!(!symbols.is_empty());
        if self.e_head.is_zero() {
            self.x_check_linear(symbols)
        } else {
            self.x_check_accelerated(symbols)
        }
    }

    fn x_check_linear(&self, symbols: &[K]) -> I {
        let mut q = I::one();
        loop {
            if self.family_fits(q, symbols) {
                return q;
            }
            q = q + I::one();
        }
    }

    /// Walks the free slot list instead of every cell. Returns the same `q`
    /// as the linear scan: candidates come up in ascending order, and any
    /// fitting `q` that keeps `q + min(symbols)` inside the in-use region
    /// must have that slot on the list.
    fn x_check_accelerated(&self, symbols: &[K]) -> I {
        let c1 = Self::sym(*symbols.iter().min().unwrap());
        let size = self.da_size();

        let mut e = self.e_head;
        while e <= size {
            let q = e - c1;
            if q >= I::one() && self.family_fits(q, symbols) {
                return q;
            }
            let next = -self.check.get(cell(e));
            debug_assert!(next > e, "free list not ascending");
            e = next;
        }

        // everything past the in-use region is free
        let q = size + I::one() - c1;
        if q < I::one() {
            I::one()
        } else {
            q
        }
    }

    fn family_fits(&self, q: I, symbols: &[K]) -> bool {
        symbols.iter().all(|c| self.slot_free(q + Self::sym(*c)))
    }

    /// A slot is free when it lies past the in-use region or is unowned.
    fn slot_free(&self, t: I) -> bool {
        t > self.da_size() || self.check.get(cell(t)) <= I::zero()
    }
}
