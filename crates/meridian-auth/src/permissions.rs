//! Static method→permission policy.
//!
//! Permission codes follow the `{service}.{module}.{entity}.{action}`
//! format. A method with no entry requires only an authenticated identity;
//! the `SUPER_ADMIN` role bypasses the table entirely (checked by the
//! authorization interceptor, not here).

use meridian_proto::methods;

/// Returns the permission code required to invoke a method.
///
/// `None` means authenticated access is sufficient.
#[must_use]
pub fn required_permission(method: &str) -> Option<&'static str> {
    let permission = match method {
        // Master-data category service
        methods::category::CREATE => "masterdata.master.category.create",
        methods::category::GET | methods::category::LIST => "masterdata.master.category.view",
        methods::category::UPDATE => "masterdata.master.category.update",
        methods::category::DELETE => "masterdata.master.category.delete",
        // Imports create rows, exports only read them.
        methods::category::IMPORT => "masterdata.master.category.create",
        methods::category::EXPORT => "masterdata.master.category.view",

        // IAM user service
        methods::user::CREATE => "iam.access.user.create",
        methods::user::GET | methods::user::LIST | methods::user::GET_ACCESS => {
            "iam.access.user.view"
        }
        methods::user::UPDATE => "iam.access.user.update",
        methods::user::DELETE => "iam.access.user.delete",

        _ => return None,
    };
    Some(permission)
}
