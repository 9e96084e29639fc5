use std::ffi::{c_int, c_void};

use chrono::{NaiveDate, NaiveDateTime};
use libsqlite3_sys::{self as ffi, SQLITE_TRANSIENT, sqlite3_stmt};

use crate::traits::value::Value;

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A value that can be bound to a positional `?` parameter.
///
/// Takes `&self` so heterogeneous arguments can be passed as
/// `&[&dyn ToSql]`, e.g. `&[&"sam", &31]`.
pub trait ToSql {
    /// - Indexes start at 1
    ///# Safety
    ///
    /// Pass in the stmt pointer (not the address). it uses sqlite3_bind_* to bind it to the correct type
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int;
}

impl ToSql for str {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        let bytes = self.as_bytes();
        let len = bytes.len() as c_int;

        unsafe {
            ffi::sqlite3_bind_text(
                stmt,
                index,
                bytes.as_ptr() as *const _,
                len,
                SQLITE_TRANSIENT(),
            )
        }
    }
}

impl ToSql for String {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        unsafe { self.as_str().bind_to(stmt, index) }
    }
}

impl ToSql for [u8] {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        if self.is_empty() {
            return unsafe { ffi::sqlite3_bind_zeroblob(stmt, index, 0) };
        }

        unsafe {
            ffi::sqlite3_bind_blob(
                stmt,
                index,
                self.as_ptr() as *const c_void,
                self.len() as c_int,
                SQLITE_TRANSIENT(),
            )
        }
    }
}

impl ToSql for Vec<u8> {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        unsafe { self.as_slice().bind_to(stmt, index) }
    }
}

macro_rules! integer_to_sql {
    ($($t:ty),*) => {
        $(
            impl ToSql for $t {
                unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
                    unsafe { ffi::sqlite3_bind_int64(stmt, index, i64::from(*self)) }
                }
            }
        )*
    };
}

integer_to_sql!(i8, i16, i32, i64, u8, u16, u32);

impl ToSql for f32 {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        unsafe { ffi::sqlite3_bind_double(stmt, index, f64::from(*self)) }
    }
}

impl ToSql for f64 {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        unsafe { ffi::sqlite3_bind_double(stmt, index, *self) }
    }
}

impl ToSql for bool {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        // true as i32 == 1
        // false as i32 == 0
        unsafe { ffi::sqlite3_bind_int(stmt, index, *self as c_int) }
    }
}

// SQLite has no temporal storage class, these go in as the same text
// CURRENT_TIMESTAMP and date('now') produce.
impl ToSql for NaiveDateTime {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        let text = self.format(DATETIME_FORMAT).to_string();
        unsafe { text.bind_to(stmt, index) }
    }
}

impl ToSql for NaiveDate {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        let text = self.format(DATE_FORMAT).to_string();
        unsafe { text.bind_to(stmt, index) }
    }
}

impl ToSql for Value {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        match self {
            Value::Integer(i) => unsafe { i.bind_to(stmt, index) },
            Value::Real(f) => unsafe { f.bind_to(stmt, index) },
            Value::Text(s) => unsafe { s.bind_to(stmt, index) },
            Value::Blob(b) => unsafe { b.bind_to(stmt, index) },
            Value::Null => unsafe { ffi::sqlite3_bind_null(stmt, index) },
        }
    }
}

impl<T: ToSql> ToSql for Option<T> {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        match self {
            Some(rust_value) => unsafe { rust_value.bind_to(stmt, index) },
            None => unsafe { ffi::sqlite3_bind_null(stmt, index) },
        }
    }
}

impl<T: ToSql + ?Sized> ToSql for &T {
    unsafe fn bind_to(&self, stmt: *mut sqlite3_stmt, index: c_int) -> c_int {
        unsafe { (**self).bind_to(stmt, index) }
    }
}
