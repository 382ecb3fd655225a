use super::{cell, DoubleArray};
use crate::traits::fixed_int::FixedInt;
use crate::Result;
use num_traits::{PrimInt, Signed, Unsigned};

impl<I, K, const N: usize> DoubleArray<I, K, N>
where
    I: PrimInt + Signed + FixedInt<N>,
    K: PrimInt + Unsigned,
{
    /// Last cell index considered in use, kept in `check[0]`.
    #[inline]
    pub(super) fn da_size(&self) -> I {
        self.check.get(0)
    }

    #[inline]
    fn set_da_size(&mut self, size: I) {
        self.check.set(0, size);
    }

    /// Writes the key counter kept in `base[0]`.
    #[inline]
    pub(super) fn set_num_keys(&mut self, keys: I) {
        self.base.set(0, keys);
    }

    /// The index offset of symbol `c`.
    #[inline]
    pub(super) fn sym(c: K) -> I {
        I::from(c).expect("symbol doesn't fit the index type")
    }

    /// The slot a transition on `c` out of `s` would land in.
    #[inline]
    pub(super) fn target(&self, s: I, c: K) -> I {
        self.base.get(cell(s)) + Self::sym(c)
    }

    /// Follows the edge `s --c-->` and returns its target, zero when the
    /// edge doesn't exist.
    pub(super) fn forward(&self, s: I, c: K) -> I {
        let t = self.target(s, c);
        if t < I::one() || t > self.da_size() {
            return I::zero();
        }

        if self.check.get(cell(t)) == s {
            t
        } else {
            I::zero()
        }
    }

    /// Collects the outgoing symbols of `s`, ascending.
    pub(super) fn labels_of(&self, s: I) -> Vec<K> {
        let mut labels = Vec::new();
        if s <= I::zero() {
            return labels;
        }

        let size = self.da_size();
        let b = self.base.get(cell(s));

        let mut c = K::one();
        loop {
            let t = b + Self::sym(c);
            if t > I::one() && t <= size && self.check.get(cell(t)) == s {
                labels.push(c);
            }

            // `max` may be the symbol type's maximum, so don't rely on the
            // increment to leave the range
            if c == self.max {
                break;
            }
            c = c + K::one();
        }

        labels
    }

    /// Writes `base[i]`, growing the in-use region when `i` lies past it.
    pub(super) fn w_base(&mut self, i: I, v: I) -> Result<()> {
        if i > self.da_size() {
            self.grow_to(i)?;
        }
        self.base.set(cell(i), v);
        Ok(())
    }

    /// Writes `check[i]`, growing the in-use region when `i` lies past it.
    ///
    /// While the free slot list is active the write keeps it spliced: a slot
    /// leaving the blank state is unlinked first, a slot becoming blank is
    /// linked in place of the plain zero write.
    pub(super) fn w_check(&mut self, i: I, v: I) -> Result<()> {
        if i > self.da_size() {
            self.grow_to(i)?;
        }

        if self.e_head.is_zero() {
            self.check.set(cell(i), v);
            return Ok(());
        }

        let old = self.check.get(cell(i));
        if v.is_zero() {
            if old >= I::zero() {
                self.link_free(i);
            }
            return Ok(());
        }

        if old < I::zero() {
            self.unlink_free(i);
        }
        self.check.set(cell(i), v);
        Ok(())
    }

    /// Raises the in-use region to `i`, growing both arrays. While the free
    /// slot list is active every fresh cell is appended to it; the old tail
    /// link already names the first fresh cell, so appending is pure linking.
    fn grow_to(&mut self, i: I) -> Result<()> {
        let old = self.da_size();
        self.base.expand_to(cell(i))?;
        self.check.expand_to(cell(i))?;

        if !self.e_head.is_zero() {
            let mut j = old + I::one();
            while j <= i {
                self.check.set(cell(j), -(j + I::one()));
                j = j + I::one();
            }
        }

        self.set_da_size(i);
        Ok(())
    }
}
