use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::borrow::Borrow;

use crate::DynString;

const ITERBLOCKLEN: usize = 8;

pub struct JoinableBuf([u8; 1]);

/// This trait represents element types that can be joined by
/// DynString's join method. It is a sealed trait that cannot be used
/// or implemented from outside the dynstring crate.
pub trait Joinable {
    fn join_prepare<'a>(&'a self, buf: &'a mut JoinableBuf) -> &'a [u8];
}

macro_rules! impl_joiner_simple {
    ($self:ty) => {
        impl Joinable for $self {
            #[inline]
            fn join_prepare<'a>(&'a self, _buf: &'a mut JoinableBuf) -> &'a [u8] {
                self.as_ref()
            }
        }
    };
}

macro_rules! impl_joiner_bytelike {
    ($self:ty) => {
        impl Joinable for $self {
            #[inline]
            fn join_prepare<'a>(&self, buf: &'a mut JoinableBuf) -> &'a [u8] {
                buf.0[0] = *(self.borrow());
                &buf.0[0..=0]
            }
        }
    };
}

impl_joiner_bytelike!(u8);
impl_joiner_bytelike!(&u8);
impl_joiner_simple!(&[u8]);
impl_joiner_simple!(Vec<u8>);
impl_joiner_simple!(Box<[u8]>);
impl_joiner_simple!(Cow<'_, [u8]>);
impl_joiner_simple!(DynString);
impl_joiner_simple!(&DynString);

impl<const N: usize> Joinable for &[u8; N] {
    #[inline]
    fn join_prepare<'a>(&'a self, _buf: &'a mut JoinableBuf) -> &'a [u8] {
        &self[..]
    }
}

// items are consumed in blocks of eight, with the size of each block
// summed up front so the result reserves once per block instead of
// once per item.
pub(crate) fn join_internal<T, I>(joiner: &[u8], iter: I) -> DynString
where
    I: IntoIterator<Item = T>,
    T: Joinable,
{
    let mut iter = iter.into_iter();
    let mut block: [Option<T>; ITERBLOCKLEN] = Default::default();
    let mut i = 0;
    let mut result = DynString::new();
    let mut resultlen = 0;
    let mut firstc = true;
    let mut firstb = true;

    loop {
        let mut buf = JoinableBuf([0; 1]);
        block[i] = iter.next();
        if block[i].is_some() && i < ITERBLOCKLEN - 1 {
            i = i + 1;
        } else {
            let (blocklen, end) = if block[i].is_some() {
                (i + 1, false)
            } else {
                (i, true)
            };
            let block = &block[0..blocklen];
            for item in block {
                let item = item.as_ref().unwrap().join_prepare(&mut buf);
                if firstc {
                    firstc = false;
                } else {
                    resultlen += joiner.len();
                }
                resultlen += item.len();
            }
            result.reserve(resultlen);
            for item in block {
                if firstb {
                    firstb = false;
                } else {
                    result += joiner;
                }
                result += item.as_ref().unwrap().join_prepare(&mut buf);
            }
            if end {
                break;
            }
            i = 0;
        }
    }
    result
}
