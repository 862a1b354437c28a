//! Low-level byte views over page storage.
//!
//! Pages keep their storage as `u64` words so the buffer base satisfies the
//! alignment guarantee. These two functions are the only `unsafe` in the
//! crate.

#![allow(unsafe_code)]

/// View a word buffer as bytes.
pub(crate) fn as_bytes(words: &[u64]) -> &[u8] {
    let len = std::mem::size_of_val(words);
    // SAFETY: `u8` has alignment 1 and no invalid bit patterns, `len`
    // covers exactly the memory of `words`, and the returned borrow shares
    // the lifetime of the input borrow.
    unsafe { std::slice::from_raw_parts(words.as_ptr().cast::<u8>(), len) }
}

/// View a mutable word buffer as mutable bytes.
pub(crate) fn as_bytes_mut(words: &mut [u64]) -> &mut [u8] {
    let len = std::mem::size_of_val(words);
    // SAFETY: as in `as_bytes`; any byte pattern written through the result
    // is a valid `u64`, and the exclusive borrow is carried over.
    unsafe { std::slice::from_raw_parts_mut(words.as_mut_ptr().cast::<u8>(), len) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_cover_every_byte() {
        let mut words = vec![0u64; 4];
        assert_eq!(as_bytes(&words).len(), 32);
        as_bytes_mut(&mut words)[8..16].fill(0xff);
        assert_eq!(words[1], u64::MAX);
        assert_eq!(words[0], 0);
    }

    #[test]
    fn byte_view_is_word_aligned() {
        let words = vec![0u64; 2];
        assert_eq!(as_bytes(&words).as_ptr() as usize % std::mem::align_of::<u64>(), 0);
    }
}
