use libsqlite3_sys::{self as ffi, SQLITE_BUSY, sqlite3, sqlite3_extended_errcode};
use std::ffi::{CStr, c_char};

/// Prefix shared by every generated mutator name.
pub const MUTATOR_PREFIX: &str = "set";

/// Derives the mutator name a result column is assigned through.
///
/// The column is split on `_`, every segment gets its first character
/// upper-cased and the segments are joined behind [`MUTATOR_PREFIX`]:
/// `reg_date` becomes `setRegDate`, `name` becomes `setName`. Empty segments
/// (`a__b`, `_id`) are dropped.
pub fn mutator_name(column: &str) -> String {
    let mut name = String::with_capacity(MUTATOR_PREFIX.len() + column.len());
    name.push_str(MUTATOR_PREFIX);

    for segment in column.split('_') {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

/// Internally calls sqlite3_extended_errcode and sqlite3_errmsg to return
/// the code and error_msg of the most recent failure on `db`
///
///  # Safety
///
/// - db must be a valid sqlite3 connection which is not NULL
pub unsafe fn get_sqlite_failiure(db: *mut sqlite3) -> (i32, String) {
    let safe_error_msg = unsafe {
        // sqlite internally handles dropping c_error_msg
        let c_error_msg = ffi::sqlite3_errmsg(db);
        CStr::from_ptr(c_error_msg as *const c_char)
    };

    let error_msg = safe_error_msg.to_string_lossy().into_owned();
    let code = unsafe { sqlite3_extended_errcode(db) };

    (code, error_msg)
}

/// Message for a status code when there is no connection to ask.
pub fn error_str(code: i32) -> String {
    unsafe { CStr::from_ptr(ffi::sqlite3_errstr(code)) }
        .to_string_lossy()
        .into_owned()
}

/// Every statement on `db` must already be finalized; `Statement` borrows
/// its `Connection`, so it is always dropped first. A busy close is logged.
///
/// # Safety
///
/// - db must be a valid sqlite3 connection or NULL
pub unsafe fn close_db(db: *mut sqlite3) {
    let code = unsafe { ffi::sqlite3_close(db) };

    if code == SQLITE_BUSY {
        tracing::warn!(code, "sqlite3_close reported the connection busy");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutator_name_single_segment() {
        assert_eq!(mutator_name("name"), "setName");
        assert_eq!(mutator_name("age"), "setAge");
    }

    #[test]
    fn test_mutator_name_snake_case() {
        assert_eq!(mutator_name("reg_date"), "setRegDate");
        assert_eq!(mutator_name("created_at_utc"), "setCreatedAtUtc");
    }

    #[test]
    fn test_mutator_name_keeps_inner_case() {
        // camelCase columns land on the same mutator as their snake_case twin
        assert_eq!(mutator_name("regDate"), "setRegDate");
        assert_eq!(mutator_name("SEQ"), "setSEQ");
    }

    #[test]
    fn test_mutator_name_drops_empty_segments() {
        assert_eq!(mutator_name("_id"), "setId");
        assert_eq!(mutator_name("a__b"), "setAB");
        assert_eq!(mutator_name(""), "set");
    }
}
