//! Checked-in-debug indexing for the generation hot loop.
//!
//! Debug builds index normally, so a desync between the sparse index and
//! the dense buffer panics with a bounds message. Release builds use
//! `get_unchecked`; callers only pass offsets produced by
//! `Playfield::offset` on wrapped, in-range coordinates.
//!
//! ```rust
//! use lifequeue_engine::fast;
//!
//! let mut cells = vec![0u8; 9];
//! fast!(cells, [4] = 2);
//! assert_eq!(*fast!(cells, [4]), 2);
//! ```

#[macro_export]
macro_rules! fast {
    // Read: fast!(slice, [index])
    ($slice:expr, [$index:expr]) => {{
        #[cfg(debug_assertions)]
        {
            &$slice[$index]
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe { $slice.get_unchecked($index) }
        }
    }};

    // Write: fast!(slice, [index] = value)
    ($slice:expr, [$index:expr] = $val:expr) => {{
        #[cfg(debug_assertions)]
        {
            $slice[$index] = $val;
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe {
                *$slice.get_unchecked_mut($index) = $val;
            }
        }
    }};
}
