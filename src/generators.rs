//! Process-wide generators.
//!
//! `G` is the standard Ristretto basepoint; `F`, `H`, `U` are independent
//! generators derived once via `hash_to_point` of fixed labels. Per
//! `spec.md` §9 these are not reconfigurable at runtime — call sites that
//! need them take them explicitly through `AddressParameters`/`CoinParameters`
//! rather than reaching for these statics directly, the same "thread the
//! public parameters, don't reach for a global" discipline the teacher
//! applies to its own `PublicParameters`.

use once_cell::sync::Lazy;

use crate::algebra::Point;
use crate::constants::{DST_F, DST_H, DST_U};

pub static G: Lazy<Point> = Lazy::new(Point::basepoint);
pub static F: Lazy<Point> = Lazy::new(|| Point::hash_to_point(DST_F, &[]));
pub static H: Lazy<Point> = Lazy::new(|| Point::hash_to_point(DST_H, &[]));
pub static U: Lazy<Point> = Lazy::new(|| Point::hash_to_point(DST_U, &[]));
