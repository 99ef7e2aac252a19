/*!
 * # Permissions Module
 *
 * Permissions are `resource:action` strings derived from a user's role.
 * Admins bypass permission checks entirely in the middleware.
 */

use super::user::UserRole;

/// Common permission string constants for compile-time safety
pub mod consts {
    // Assets
    pub const ASSETS_READ: &str = "assets:read";
    pub const ASSETS_CREATE: &str = "assets:create";
    pub const ASSETS_UPDATE: &str = "assets:update";
    pub const ASSETS_DELETE: &str = "assets:delete";

    // Asset holders
    pub const HOLDERS_READ: &str = "holders:read";
    pub const HOLDERS_MANAGE: &str = "holders:manage";

    // Assignments
    pub const ASSIGNMENTS_READ: &str = "assignments:read";
    pub const ASSIGNMENTS_CREATE: &str = "assignments:create";
    pub const ASSIGNMENTS_UPDATE: &str = "assignments:update";

    // Maintenance
    pub const MAINTENANCE_READ: &str = "maintenance:read";
    pub const MAINTENANCE_MANAGE: &str = "maintenance:manage";

    // Shipments
    pub const SHIPMENTS_READ: &str = "shipments:read";
    pub const SHIPMENTS_CREATE: &str = "shipments:create";
    pub const SHIPMENTS_UPDATE: &str = "shipments:update";

    // Return requests
    pub const RETURNS_READ: &str = "returns:read";
    pub const RETURNS_CREATE: &str = "returns:create";
    pub const RETURNS_RESOLVE: &str = "returns:resolve";

    // Commerce records
    pub const CUSTOMERS_READ: &str = "customers:read";
    pub const CUSTOMERS_MANAGE: &str = "customers:manage";
    pub const PRODUCTS_READ: &str = "products:read";
    pub const PRODUCTS_MANAGE: &str = "products:manage";
    pub const ORDERS_READ: &str = "orders:read";
    pub const ORDERS_CREATE: &str = "orders:create";
    pub const ORDERS_UPDATE: &str = "orders:update";

    // Administration
    pub const USERS_MANAGE: &str = "users:manage";
}

/// All read-only permissions
fn read_permissions() -> Vec<String> {
    use consts::*;
    [
        ASSETS_READ,
        HOLDERS_READ,
        ASSIGNMENTS_READ,
        MAINTENANCE_READ,
        SHIPMENTS_READ,
        RETURNS_READ,
        CUSTOMERS_READ,
        PRODUCTS_READ,
        ORDERS_READ,
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

/// All write permissions short of administration
fn write_permissions() -> Vec<String> {
    use consts::*;
    [
        ASSETS_CREATE,
        ASSETS_UPDATE,
        ASSETS_DELETE,
        HOLDERS_MANAGE,
        ASSIGNMENTS_CREATE,
        ASSIGNMENTS_UPDATE,
        MAINTENANCE_MANAGE,
        SHIPMENTS_CREATE,
        SHIPMENTS_UPDATE,
        RETURNS_CREATE,
        RETURNS_RESOLVE,
        CUSTOMERS_MANAGE,
        PRODUCTS_MANAGE,
        ORDERS_CREATE,
        ORDERS_UPDATE,
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

/// Expand a role into its permission set.
///
/// Admins get everything including user administration; the middleware also
/// short-circuits for them, so the expansion mostly matters for token
/// introspection and the `/api/me` response.
pub fn role_permissions(role: UserRole) -> Vec<String> {
    match role {
        UserRole::Admin => {
            let mut perms = read_permissions();
            perms.extend(write_permissions());
            perms.push(consts::USERS_MANAGE.to_string());
            perms
        }
        UserRole::Manager => {
            let mut perms = read_permissions();
            perms.extend(write_permissions());
            perms
        }
        UserRole::Viewer => read_permissions(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_has_no_write_permissions() {
        let perms = role_permissions(UserRole::Viewer);
        assert!(perms.contains(&consts::ASSETS_READ.to_string()));
        assert!(!perms.iter().any(|p| p.ends_with(":create")
            || p.ends_with(":update")
            || p.ends_with(":manage")
            || p.ends_with(":delete")));
    }

    #[test]
    fn manager_can_write_but_not_administer() {
        let perms = role_permissions(UserRole::Manager);
        assert!(perms.contains(&consts::ASSIGNMENTS_CREATE.to_string()));
        assert!(!perms.contains(&consts::USERS_MANAGE.to_string()));
    }

    #[test]
    fn admin_has_user_administration() {
        let perms = role_permissions(UserRole::Admin);
        assert!(perms.contains(&consts::USERS_MANAGE.to_string()));
    }
}
