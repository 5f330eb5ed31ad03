use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::borrow::Borrow;

use crate::DynString;

const ITERBLOCKLEN: usize = 8;

macro_rules! impl_fromiter_bytelike {
    ($t:ty) => {
        impl<'a> FromIterator<$t> for DynString {
            fn from_iter<I>(iter: I) -> DynString
            where
                I: IntoIterator<Item = $t>,
            {
                let iter = iter.into_iter();

                let mut result = DynString::with_capacity(iter.size_hint().0);
                for c in iter {
                    result += &[*c.borrow()];
                }
                result
            }
        }
    };
}

// the type to be implemented must be passed twice, once with any
// necessary lifetime parameters set to 'a and once without any
// lifetime parameters.
macro_rules! impl_fromiter_stringlike {
    ($t:ty, $tplain:ty) => {
        impl<'a> FromIterator<$t> for DynString {
            fn from_iter<I>(iter: I) -> DynString
            where
                I: IntoIterator<Item = $t>,
            {
                let mut iter = iter.into_iter();
                const NONE: Option<$tplain> = None;
                let mut block = [NONE; ITERBLOCKLEN];
                let mut result = DynString::new();
                let mut i = 0;
                let mut resultlen = 0;
                loop {
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
                            resultlen += item.as_ref().unwrap().len();
                        }
                        result.reserve(resultlen);
                        for item in block {
                            result += item.as_ref().unwrap();
                        }
                        if end {
                            break;
                        }
                        i = 0;
                    }
                }
                result
            }
        }
    };
}

impl_fromiter_bytelike!(u8);
impl_fromiter_bytelike!(&'a u8);
impl_fromiter_stringlike!(&'a [u8], &[u8]);
impl_fromiter_stringlike!(Vec<u8>, Vec<u8>);
impl_fromiter_stringlike!(Box<[u8]>, Box<[u8]>);
impl_fromiter_stringlike!(Cow<'a, [u8]>, Cow<'_, [u8]>);
impl_fromiter_stringlike!(DynString, DynString);
