use std::fmt::Debug;

use civic_ledger::ErrorCode;

pub fn assert_error_code<T: Debug>(res: Result<T, ErrorCode>, code: ErrorCode) {
    assert_eq!(res.unwrap_err(), code)
}
