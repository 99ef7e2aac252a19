//! OpenAPI documentation assembled from the handler annotations.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::google_login,
        handlers::auth::google_login_url,
        handlers::auth::refresh,
        handlers::auth::me,
        // Assets
        handlers::assets::list_assets,
        handlers::assets::get_asset,
        handlers::assets::get_asset_by_tag,
        handlers::assets::create_asset,
        handlers::assets::update_asset,
        handlers::assets::retire_asset,
        handlers::assets::delete_asset,
        // Asset holders
        handlers::asset_holders::list_holders,
        handlers::asset_holders::get_holder,
        handlers::asset_holders::create_holder,
        handlers::asset_holders::update_holder,
        handlers::asset_holders::deactivate_holder,
        // Assignments
        handlers::assignments::list_assignments,
        handlers::assignments::get_assignment,
        handlers::assignments::create_assignment,
        handlers::assignments::return_assignment,
        handlers::assignments::sweep_overdue,
        // Maintenance
        handlers::maintenance::list_logs,
        handlers::maintenance::get_log,
        handlers::maintenance::schedule_maintenance,
        handlers::maintenance::start_maintenance,
        handlers::maintenance::complete_maintenance,
        handlers::maintenance::cancel_maintenance,
        // Shipments
        handlers::shipments::list_shipments,
        handlers::shipments::get_shipment,
        handlers::shipments::create_shipment,
        handlers::shipments::dispatch_shipment,
        handlers::shipments::deliver_shipment,
        handlers::shipments::cancel_shipment,
        handlers::shipments::track_by_number,
        // Returns
        handlers::returns::list_returns,
        handlers::returns::get_return,
        handlers::returns::submit_return,
        handlers::returns::approve_return,
        handlers::returns::reject_return,
        handlers::returns::complete_return,
        // Customers
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        // Products
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        // Orders
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::create_order,
        handlers::orders::confirm_order,
        handlers::orders::fulfill_order,
        handlers::orders::cancel_order,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        handlers::auth::LoginRequest,
        handlers::auth::RegisterRequest,
        handlers::auth::GoogleLoginRequest,
        handlers::auth::RefreshRequest,
        handlers::auth::AuthResponse,
        handlers::auth::UserSummary,
        handlers::assets::AssetSummary,
        handlers::assets::CreateAssetRequest,
        handlers::assets::UpdateAssetRequest,
        handlers::asset_holders::HolderSummary,
        handlers::asset_holders::CreateHolderRequest,
        handlers::asset_holders::UpdateHolderRequest,
        handlers::assignments::AssignmentSummary,
        handlers::assignments::CreateAssignmentRequest,
        handlers::assignments::ReturnAssignmentRequest,
        handlers::maintenance::MaintenanceLogSummary,
        handlers::maintenance::ScheduleMaintenanceRequest,
        handlers::maintenance::CompleteMaintenanceRequest,
        handlers::shipments::ShipmentSummary,
        handlers::shipments::CreateShipmentRequest,
        handlers::returns::ReturnRequestSummary,
        handlers::returns::SubmitReturnRequest,
        handlers::returns::ResolveReturnRequest,
        handlers::returns::CompleteReturnRequest,
        handlers::customers::CustomerSummary,
        handlers::customers::CreateCustomerRequest,
        handlers::customers::UpdateCustomerRequest,
        handlers::products::ProductSummary,
        handlers::products::CreateProductRequest,
        handlers::products::UpdateProductRequest,
        handlers::orders::OrderSummary,
        handlers::orders::OrderItemSummary,
        handlers::orders::CreateOrderRequest,
        handlers::orders::OrderLineRequest,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Login, registration, and token management"),
        (name = "assets", description = "Asset registry and lifecycle"),
        (name = "asset-holders", description = "People and departments holding assets"),
        (name = "assignments", description = "Asset custody periods"),
        (name = "maintenance", description = "Service records"),
        (name = "shipments", description = "Inter-site asset movement"),
        (name = "returns", description = "Return request workflow"),
        (name = "customers", description = "Customer records"),
        (name = "products", description = "Product catalog"),
        (name = "orders", description = "Customer orders"),
    ),
    info(
        title = "AssetTrack API",
        description = "Equipment and asset tracking backend"
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the generated document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds_and_lists_core_paths() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("openapi serializes");
        assert!(json.contains("/api/v1/assets"));
        assert!(json.contains("/api/v1/assignments"));
        assert!(json.contains("/api/login"));
        assert!(json.contains("/api/google-login"));
    }
}
