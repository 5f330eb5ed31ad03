use core::alloc::Layout;
use core::mem::size_of;
use core::mem::align_of;
use core::ptr::NonNull;

use alloc::alloc::alloc;
use alloc::alloc::realloc;
use alloc::alloc::dealloc;
use alloc::alloc::handle_alloc_error;

/// Once a string reaches this size, growth switches from doubling to
/// overallocating by this fixed amount.
pub const MAX_PREALLOC: usize = 1024 * 1024;

// The header lives at the very start of the allocation, immediately
// before the payload bytes. External code only ever sees the payload
// pointer; walking back by size_of::<Header>() recovers the header.
//
//    | len | free | payload bytes ......... | 0 |
//    ^ allocation  ^ payload pointer            ^ terminator
#[repr(C)]
pub(crate) struct Header {
    pub(crate) len: usize,
    pub(crate) free: usize,
}

/// Compute the payload capacity to allocate when a string must grow to
/// hold `newlen` bytes.
///
/// Below MAX_PREALLOC the capacity doubles, so a string built by
/// repeated appends relocates O(log n) times. At or above it, growth is
/// linear, capping the wasted space at a fixed MAX_PREALLOC.
#[inline]
pub(crate) fn grown_capacity(newlen: usize) -> usize {
    if newlen < MAX_PREALLOC {
        newlen * 2
    } else {
        match newlen.checked_add(MAX_PREALLOC) {
            Some(cap) => cap,
            None => capacity_overflow(),
        }
    }
}

#[cold]
pub(crate) fn capacity_overflow() -> ! {
    panic!("DynString capacity overflow");
}

// total allocation size for a payload capacity of cap, with overflow
// checks in front of the allocator.
#[inline]
fn block_size(cap: usize) -> usize {
    let size = size_of::<Header>()
        .checked_add(cap)
        .and_then(|s| s.checked_add(1));
    match size {
        Some(size) if size <= isize::MAX as usize => size,
        _ => capacity_overflow(),
    }
}

#[inline]
pub(crate) fn layout_for(cap: usize) -> Layout {
    // block_size has already rejected sizes over isize::MAX and the
    // alignment of Header is a power of two.
    unsafe { Layout::from_size_align_unchecked(block_size(cap), align_of::<Header>()) }
}

/// Recover the header address from a payload pointer.
#[inline]
pub(crate) unsafe fn header_ptr(payload: NonNull<u8>) -> *mut Header {
    unsafe { payload.as_ptr().sub(size_of::<Header>()) as *mut Header }
}

/// Allocate a fresh block with the given header fields and return the
/// payload pointer. The payload bytes and the terminator are left
/// uninitialized; the caller fills them in.
pub(crate) fn alloc_block(len: usize, free: usize) -> NonNull<u8> {
    let cap = match len.checked_add(free) {
        Some(cap) => cap,
        None => capacity_overflow(),
    };
    let layout = layout_for(cap);
    unsafe {
        let block = alloc(layout);
        if block.is_null() {
            handle_alloc_error(layout);
        }
        let hdr = block as *mut Header;
        (*hdr).len = len;
        (*hdr).free = free;
        NonNull::new_unchecked(block.add(size_of::<Header>()))
    }
}

/// Grow or shrink the block behind `payload` to a payload capacity of
/// exactly `newcap`, preserving `len` bytes of content plus the
/// terminator, and return the (possibly relocated) payload pointer.
///
/// SAFETY: `payload` must have come from alloc_block/realloc_block and
/// `newcap` must be at least the stored len.
pub(crate) unsafe fn realloc_block(payload: NonNull<u8>, newcap: usize) -> NonNull<u8> {
    unsafe {
        let hdr = header_ptr(payload);
        let len = (*hdr).len;
        debug_assert!(newcap >= len);
        let oldlayout = layout_for(len + (*hdr).free);
        let newlayout = layout_for(newcap);
        let block = realloc(hdr as *mut u8, oldlayout, newlayout.size());
        if block.is_null() {
            handle_alloc_error(newlayout);
        }
        let hdr = block as *mut Header;
        (*hdr).free = newcap - len;
        NonNull::new_unchecked(block.add(size_of::<Header>()))
    }
}

/// Release the block behind `payload`.
///
/// SAFETY: `payload` must have come from alloc_block/realloc_block and
/// must not be used again.
pub(crate) unsafe fn dealloc_block(payload: NonNull<u8>) {
    unsafe {
        let hdr = header_ptr(payload);
        let layout = layout_for((*hdr).len + (*hdr).free);
        dealloc(hdr as *mut u8, layout);
    }
}

#[test]
fn test_grown_capacity_doubles_below_cutoff() {
    assert_eq!(grown_capacity(1), 2);
    assert_eq!(grown_capacity(100), 200);
    assert_eq!(grown_capacity(MAX_PREALLOC - 1), (MAX_PREALLOC - 1) * 2);
}

#[test]
fn test_grown_capacity_linear_at_cutoff() {
    assert_eq!(grown_capacity(MAX_PREALLOC), MAX_PREALLOC * 2);
    assert_eq!(grown_capacity(MAX_PREALLOC + 1), MAX_PREALLOC * 2 + 1);
    assert_eq!(grown_capacity(10 * MAX_PREALLOC), 11 * MAX_PREALLOC);
}

#[test]
fn test_block_roundtrip() {
    unsafe {
        let p = alloc_block(0, 7);
        let hdr = header_ptr(p);
        assert_eq!((*hdr).len, 0);
        assert_eq!((*hdr).free, 7);
        let p = realloc_block(p, 100);
        let hdr = header_ptr(p);
        assert_eq!((*hdr).len, 0);
        assert_eq!((*hdr).free, 100);
        dealloc_block(p);
    }
}

#[test]
#[should_panic(expected = "capacity overflow")]
fn test_block_size_overflow() {
    let _ = block_size(usize::MAX - size_of::<Header>());
}
