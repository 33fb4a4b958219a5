pub trait NumExt {
    /// Returns the base 2 logarithm of the number, rounding up to the next integer.
    fn ilog2_ceil(self) -> Self;
}

impl NumExt for usize {
    #[inline]
    fn ilog2_ceil(self) -> Self {
        // `0.next_power_of_two()` is 1, so both 0 and 1 map to 0.
        self.next_power_of_two().trailing_zeros() as Self
    }
}
