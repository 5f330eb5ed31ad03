use core::cmp::{max, min};
use core::mem::size_of;
use core::mem::MaybeUninit;
use core::ptr;
use core::ptr::NonNull;
use core::slice;
use core::ops::Deref;
use core::ops::DerefMut;
use core::ops::Add;
use core::ops::AddAssign;
use core::borrow::Borrow;
use core::hash::Hasher;
use core::hash::Hash;

use alloc::vec::Vec;
use alloc::str;
use alloc::fmt;
use crate::raw;
use crate::raw::Header;

/// A binary-safe dynamic byte string.
///
/// A DynString is a single pointer to the payload bytes of one
/// allocation; the length and free-capacity bookkeeping lives in a
/// header immediately before the payload, and a zero terminator
/// (not counted in the length) always follows the content. Content
/// may contain zero bytes, the length field is authoritative.
///
/// Operations that may relocate the allocation take the string by
/// value and return the one valid handle going forward, so holding on
/// to a stale handle is a compile error rather than a dangling
/// pointer.
///
/// Allocation failure aborts the process (via handle_alloc_error),
/// there is no recoverable-error path. Requested sizes that overflow
/// panic before reaching the allocator.
pub struct DynString {
    ptr: NonNull<u8>,
}

unsafe impl Send for DynString {}
unsafe impl Sync for DynString {}

impl DynString {
    #[inline]
    fn header(&self) -> *mut Header {
        unsafe { raw::header_ptr(self.ptr) }
    }

    /// Creates a new empty DynString.
    /// Unlike most string types this allocates: an empty string is a
    /// real block holding a header and a terminator.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty DynString with room for at least cap bytes
    /// before the first reallocation.
    pub fn with_capacity(cap: usize) -> Self {
        let ptr = raw::alloc_block(0, cap);
        unsafe { *ptr.as_ptr() = 0 };
        DynString { ptr }
    }

    /// Creates a DynString from a slice, with no spare capacity.
    pub fn from_slice(s: &[u8]) -> Self {
        let ptr = raw::alloc_block(s.len(), 0);
        unsafe {
            ptr::copy_nonoverlapping(s.as_ptr(), ptr.as_ptr(), s.len());
            *ptr.as_ptr().add(s.len()) = 0;
        }
        DynString { ptr }
    }

    /// The number of content bytes. O(1), read from the header.
    #[inline]
    pub fn len(&self) -> usize {
        unsafe { (*self.header()).len }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of allocated-but-unused bytes after the content.
    /// O(1), read from the header.
    #[inline]
    pub fn available(&self) -> usize {
        unsafe { (*self.header()).free }
    }

    /// Total payload capacity, len() + available().
    #[inline]
    pub fn capacity(&self) -> usize {
        unsafe { (*self.header()).len + (*self.header()).free }
    }

    /// Total size of the allocation, including the header and the
    /// terminator.
    #[inline]
    pub fn alloc_size(&self) -> usize {
        size_of::<Header>() + self.capacity() + 1
    }

    /// Pointer to the first payload byte. The byte at offset len() is
    /// always zero, so for content without embedded zeros this can be
    /// handed to APIs expecting a terminated byte sequence.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    // ensure there is room for at least extra more bytes beyond the
    // current length, reallocating per the growth policy if needed.
    // every growing operation funnels through here.
    fn grow_for(&mut self, extra: usize) {
        unsafe {
            let hdr = self.header();
            if (*hdr).free >= extra {
                return;
            }
            let newlen = match (*hdr).len.checked_add(extra) {
                Some(n) => n,
                None => raw::capacity_overflow(),
            };
            self.ptr = raw::realloc_block(self.ptr, raw::grown_capacity(newlen));
        }
    }

    /// Ensure the total capacity is at least mincap bytes.
    pub fn reserve(&mut self, mincap: usize) {
        if mincap > self.capacity() {
            let len = self.len();
            self.grow_for(mincap - len);
        }
    }

    /// Ensure there is room for at least extra more bytes beyond the
    /// current length. The string relocates if and only if
    /// available() was less than extra.
    pub fn make_room(mut self, extra: usize) -> Self {
        self.grow_for(extra);
        self
    }

    /// Appends a slice to the end of the string in place.
    pub fn push_slice(&mut self, t: &[u8]) {
        self.grow_for(t.len());
        unsafe {
            let hdr = self.header();
            let len = (*hdr).len;
            ptr::copy_nonoverlapping(t.as_ptr(), self.ptr.as_ptr().add(len), t.len());
            (*hdr).len = len + t.len();
            (*hdr).free -= t.len();
            *self.ptr.as_ptr().add(len + t.len()) = 0;
        }
    }

    /// Appends a slice, returning the possibly relocated handle.
    pub fn append(mut self, t: &[u8]) -> Self {
        self.push_slice(t);
        self
    }

    /// Replaces the content with a copy of t, growing the allocation
    /// only when the existing capacity cannot hold it.
    pub fn overwrite(mut self, t: &[u8]) -> Self {
        if self.capacity() < t.len() {
            let len = self.len();
            self.grow_for(t.len() - len);
        }
        unsafe {
            let hdr = self.header();
            let total = (*hdr).len + (*hdr).free;
            ptr::copy_nonoverlapping(t.as_ptr(), self.ptr.as_ptr(), t.len());
            (*hdr).len = t.len();
            (*hdr).free = total - t.len();
            *self.ptr.as_ptr().add(t.len()) = 0;
        }
        self
    }

    /// Truncates the string to the inclusive sub-range [start, end],
    /// in place, never relocating. Negative indices count from the
    /// end (-1 is the last byte), out of range indices clamp, and a
    /// normalized start past the normalized end yields the empty
    /// string. Trailing bytes stay allocated as spare capacity.
    pub fn range(mut self, start: isize, end: isize) -> Self {
        unsafe {
            let hdr = self.header();
            let len = (*hdr).len;
            let ilen = len as isize;
            // clamp both indices into [0, len] before any length math,
            // so extreme inputs cannot overflow end - start + 1
            let start = if start < 0 { max(ilen + start, 0) } else { min(start, ilen) };
            let end = if end < 0 { max(ilen + end, 0) } else { min(end, ilen - 1) };
            let newlen = if start > end || start >= ilen {
                0
            } else {
                (end - start + 1) as usize
            };
            if start != 0 && newlen != 0 {
                // the regions may overlap
                ptr::copy(self.ptr.as_ptr().add(start as usize), self.ptr.as_ptr(), newlen);
            }
            (*hdr).free += len - newlen;
            (*hdr).len = newlen;
            *self.ptr.as_ptr().add(newlen) = 0;
        }
        self
    }

    /// Lazily empties the string. The capacity is kept and the old
    /// bytes are not scrubbed, so a following append can reuse the
    /// allocation.
    pub fn clear(mut self) -> Self {
        unsafe {
            let hdr = self.header();
            (*hdr).free += (*hdr).len;
            (*hdr).len = 0;
            *self.ptr.as_ptr() = 0;
        }
        self
    }

    /// Reallocates to exactly the content size, giving accumulated
    /// spare capacity back to the allocator. Afterwards available()
    /// is zero.
    pub fn shrink_to_fit(mut self) -> Self {
        unsafe {
            let len = (*self.header()).len;
            self.ptr = raw::realloc_block(self.ptr, len);
        }
        self
    }

    /// Grows the string to newlen bytes, zero-filling the added
    /// region. Does nothing when newlen is not larger than the
    /// current length.
    pub fn grow_zeroed(mut self, newlen: usize) -> Self {
        let curlen = self.len();
        if newlen <= curlen {
            return self;
        }
        self.grow_for(newlen - curlen);
        unsafe {
            let hdr = self.header();
            let total = (*hdr).len + (*hdr).free;
            // covers the added region and the terminator slot
            ptr::write_bytes(self.ptr.as_ptr().add(curlen), 0, newlen - curlen + 1);
            (*hdr).len = newlen;
            (*hdr).free = total - newlen;
        }
        self
    }

    /// The unused region after the content, for direct writes.
    /// Commit bytes written here with incr_len.
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<u8>] {
        unsafe {
            let hdr = self.header();
            slice::from_raw_parts_mut(
                self.ptr.as_ptr().add((*hdr).len) as *mut MaybeUninit<u8>,
                (*hdr).free,
            )
        }
    }

    /// Moves incr bytes of spare capacity into the content (or gives
    /// content back to the spare region when incr is negative) and
    /// rewrites the terminator. Panics when incr does not fit the
    /// header bounds.
    ///
    /// SAFETY: with a positive incr the caller must have initialized
    /// the first incr bytes of spare_capacity_mut.
    pub unsafe fn incr_len(&mut self, incr: isize) {
        unsafe {
            let hdr = self.header();
            if incr >= 0 {
                assert!(incr as usize <= (*hdr).free, "incr_len past the spare capacity");
                (*hdr).len += incr as usize;
                (*hdr).free -= incr as usize;
            } else {
                let dec = incr.unsigned_abs();
                assert!(dec <= (*hdr).len, "incr_len below a length of zero");
                (*hdr).len -= dec;
                (*hdr).free += dec;
            }
            *self.ptr.as_ptr().add((*hdr).len) = 0;
        }
    }

    /// Re-syncs the length with the zero-terminated view of the
    /// content: the length becomes the offset of the first zero byte,
    /// if the content contains one. Pairs with direct writes through
    /// DerefMut.
    pub fn update_len(&mut self) {
        unsafe {
            let hdr = self.header();
            let len = (*hdr).len;
            let s = slice::from_raw_parts(self.ptr.as_ptr(), len);
            if let Some(pos) = s.iter().position(|&b| b == 0) {
                (*hdr).free += len - pos;
                (*hdr).len = pos;
            }
        }
    }

    /// Removes bytes contained in cset from both ends of the string,
    /// in place, never relocating.
    pub fn trim(mut self, cset: &[u8]) -> Self {
        unsafe {
            let hdr = self.header();
            let len = (*hdr).len;
            let s = slice::from_raw_parts(self.ptr.as_ptr(), len);
            let mut start = 0;
            while start < len && cset.contains(&s[start]) {
                start += 1;
            }
            let mut end = len;
            while end > start && cset.contains(&s[end - 1]) {
                end -= 1;
            }
            let newlen = end - start;
            if start != 0 && newlen != 0 {
                ptr::copy(self.ptr.as_ptr().add(start), self.ptr.as_ptr(), newlen);
            }
            (*hdr).free += len - newlen;
            (*hdr).len = newlen;
            *self.ptr.as_ptr().add(newlen) = 0;
        }
        self
    }

    /// Substitutes bytes in place: every content byte equal to
    /// from[i] becomes to[i], the first matching entry wins. Panics
    /// when the sets differ in length.
    pub fn map_bytes(mut self, from: &[u8], to: &[u8]) -> Self {
        assert_eq!(from.len(), to.len(), "map_bytes requires sets of equal length");
        for b in self.deref_mut() {
            for (j, f) in from.iter().enumerate() {
                if *b == *f {
                    *b = to[j];
                    break;
                }
            }
        }
        self
    }

    /// Renders a signed integer in decimal.
    pub fn from_int(value: i64) -> Self {
        Self::with_capacity(20).append_fmt(format_args!("{}", value))
    }

    /// Appends formatted text, the same way the write! macro would.
    pub fn append_fmt(mut self, args: fmt::Arguments<'_>) -> Self {
        // our write_str never fails, so an error can only come from a
        // broken Display impl; panic like alloc::fmt::format does.
        fmt::write(&mut self, args).expect("a formatting trait implementation returned an error");
        self
    }

    /// Appends the quoted, escaped rendering of t. Printable ASCII is
    /// kept verbatim, common control characters get named escapes and
    /// everything else becomes \xHH.
    pub fn append_repr(mut self, t: &[u8]) -> Self {
        self.push_slice(b"\"");
        let _ = repr_body(&mut self, t); // infallible into a DynString
        self.push_slice(b"\"");
        self
    }

    /// Joins together an iterator of byte strings, using self as a
    /// separator.
    pub fn join<T, I>(&self, iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: crate::join::Joinable,
    {
        crate::join::join_internal(self, iter)
    }
}

impl Drop for DynString {
    fn drop(&mut self) {
        unsafe { raw::dealloc_block(self.ptr) }
    }
}

impl Clone for DynString {
    /// Copies exactly the content; the source's spare capacity is not
    /// preserved.
    fn clone(&self) -> Self {
        DynString::from_slice(self)
    }
}

impl Deref for DynString {
    type Target = [u8];
    #[inline]
    fn deref(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), (*self.header()).len) }
    }
}

impl DerefMut for DynString {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), (*self.header()).len) }
    }
}

impl Add<&[u8]> for DynString {
    type Output = Self;
    fn add(mut self, rhs: &[u8]) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign<&[u8]> for DynString {
    fn add_assign(&mut self, other: &[u8]) {
        self.push_slice(other);
    }
}

impl fmt::Write for DynString {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_slice(s.as_bytes());
        Ok(())
    }
}

// write the escaped form of s, without the surrounding quotes, into
// any fmt sink. Used by both Debug and append_repr.
fn repr_body<W: fmt::Write>(w: &mut W, s: &[u8]) -> fmt::Result {
    let mut groupstart = 0;
    let len = s.len();
    for p in 0..len {
        let c = s[p];
        if (c < 0x20) || (c > 0x7E) || (c == b'\\') || (c == b'\"') {
            // we found a character that can't be written directly,
            // flush any plain characters waiting before it
            if groupstart < p {
                unsafe {
                    // safety: we have validated that this subsequence is ascii only
                    w.write_str(str::from_utf8_unchecked(&s[groupstart..p]))?;
                }
            }
            match c {
                b'\\' => w.write_str("\\\\")?,
                b'\"' => w.write_str("\\\"")?,
                b'\n' => w.write_str("\\n")?,
                b'\r' => w.write_str("\\r")?,
                b'\t' => w.write_str("\\t")?,
                0x07 => w.write_str("\\a")?,
                0x08 => w.write_str("\\b")?,
                _ => {
                    const HEX: &[u8; 16] = b"0123456789abcdef";
                    let escaped = [b'\\', b'x', HEX[(c >> 4) as usize], HEX[(c & 0xF) as usize]];
                    unsafe {
                        // safety: we know the escape is ascii
                        w.write_str(str::from_utf8_unchecked(&escaped))?;
                    }
                }
            }
            groupstart = p + 1;
        }
    }
    if groupstart < len {
        unsafe {
            // safety: we have validated that this subsequence is ascii only
            w.write_str(str::from_utf8_unchecked(&s[groupstart..len]))?;
        }
    }
    Ok(())
}

impl fmt::Debug for DynString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str("b\"")?;
        repr_body(f, self)?;
        f.write_str("\"")
    }
}

impl PartialEq for DynString {
    fn eq(&self, other: &DynString) -> bool {
        return self.deref() == other.deref();
    }
}
impl Eq for DynString {}

impl PartialEq<&[u8]> for DynString {
    fn eq(&self, other: &&[u8]) -> bool {
        return self.deref() == *other;
    }
}

impl PartialEq<DynString> for &[u8] {
    fn eq(&self, other: &DynString) -> bool {
        return *self == other.deref();
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for DynString {
    fn eq(&self, other: &&[u8; N]) -> bool {
        return self.deref() == *other;
    }
}

impl<const N: usize> PartialEq<DynString> for &[u8; N] {
    fn eq(&self, other: &DynString) -> bool {
        return *self == other.deref();
    }
}

impl Borrow<[u8]> for DynString {
    #[inline]
    fn borrow(&self) -> &[u8] {
        self.deref()
    }
}

impl Hash for DynString {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.deref().hash(state);
    }
}

impl PartialOrd for DynString {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.deref().partial_cmp(other.deref())
    }
}

impl Ord for DynString {
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.deref().cmp(other.deref())
    }
}

impl From<&[u8]> for DynString {
    #[inline]
    fn from(s: &[u8]) -> Self {
        Self::from_slice(s)
    }
}

impl<const N: usize> From<&[u8; N]> for DynString {
    #[inline]
    fn from(s: &[u8; N]) -> Self {
        Self::from_slice(s)
    }
}

impl From<&str> for DynString {
    #[inline]
    fn from(s: &str) -> Self {
        Self::from_slice(s.as_bytes())
    }
}

impl From<&Vec<u8>> for DynString {
    #[inline]
    fn from(s: &Vec<u8>) -> Self {
        Self::from_slice(s)
    }
}

impl From<&DynString> for DynString {
    #[inline]
    fn from(s: &DynString) -> Self {
        s.clone()
    }
}

impl<T> AsMut<T> for DynString
where
    [u8]: AsMut<T>,
    T: ?Sized,
{
    fn as_mut(&mut self) -> &mut T {
        self.deref_mut().as_mut()
    }
}

impl<T> AsRef<T> for DynString
where
    [u8]: AsRef<T>,
    T: ?Sized,
{
    fn as_ref(&self) -> &T {
        self.deref().as_ref()
    }
}

impl Default for DynString {
    #[inline]
    fn default() -> DynString {
        Self::new()
    }
}

/// Convenience macro to create a DynString.
///
/// The user may pass byte string literals, array expressions that are
/// compile time constants and have element type u8, or expressions of
/// type &[u8], &[u8;N], &str, &Vec<u8> and &DynString.
///
/// Passing an array expression that is not a compile time constant
/// will produce errors, to avoid this create a reference to the
/// array.
#[macro_export]
macro_rules! dynstring {
    ($v:literal) => {
        $crate::DynString::from_slice($v.as_ref())
    };
    ([$($b:expr),+]) => {
        $crate::DynString::from_slice({
            const ARR: &[u8] = &[$($b),+];
            ARR
        })
    };
    ($v:expr) => {
        $crate::DynString::from($v)
    };
}

#[test]
fn test_grow_for() {
    let mut s = DynString::from_slice(b"test");
    assert_eq!(s.available(), 0);
    let oldptr = s.as_ptr();
    s.grow_for(0); // satisfied by free == 0, no reallocation
    assert_eq!(s.as_ptr(), oldptr);
    s.grow_for(10);
    assert_eq!(s.len(), 4);
    assert_eq!(s.capacity(), 28); // double of the requested 14
    assert_eq!(s, b"test");
    let oldptr = s.as_ptr();
    s.grow_for(24); // exactly the spare capacity, no reallocation
    assert_eq!(s.as_ptr(), oldptr);
    assert_eq!(s.capacity(), 28);
}

#[test]
fn test_terminator_after_every_op() {
    fn terminated(s: &DynString) -> bool {
        unsafe { *s.as_ptr().add(s.len()) == 0 }
    }
    let s = DynString::from_slice(b"hello");
    assert!(terminated(&s));
    let s = s.append(b",world");
    assert!(terminated(&s));
    let s = s.range(0, 4);
    assert!(terminated(&s));
    let s = s.grow_zeroed(32);
    assert!(terminated(&s));
    let s = s.clear();
    assert!(terminated(&s));
    let s = s.shrink_to_fit();
    assert!(terminated(&s));
}

#[test]
fn test_header_bookkeeping() {
    let s = DynString::with_capacity(10);
    assert_eq!(s.len(), 0);
    assert_eq!(s.available(), 10);
    assert_eq!(s.alloc_size(), size_of::<Header>() + 11);
    let s = s.append(b"abc");
    assert_eq!(s.len(), 3);
    assert_eq!(s.available(), 7);
    assert_eq!(s.alloc_size(), size_of::<Header>() + 11);
}
