//! A coupon-validating order-placement service.
//!
//! The distinctive engineering problem here is validating a coupon code
//! against a corpus of very large (~1 GB each) sorted text files, each
//! holding one coupon code per line, under a rule that a code is accepted
//! only when it appears in at least two of the files. The [`coupon`] module
//! holds the on-disk partial index, the range-pruned concurrent fan-out
//! search, and the bounded-memory two-level binary search inside each file.
//! [`external_sort`] is the offline pre-processing step that produces the
//! sorted input files those searches rely on.
//!
//! Product catalog lookup, order creation and HTTP routing are ambient
//! request plumbing, kept in [`catalog`], [`orders`] and [`http`].

pub mod app_config;
pub mod catalog;
pub mod coupon;
pub mod error;
pub mod external_sort;
pub mod http;
pub mod orders;
