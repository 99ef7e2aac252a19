use crate::auth::AuthUser;
use crate::entities::{asset, maintenance_log, shipment};
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{Asset, Assignment, MaintenanceLog, ReturnRequest, Shipment};
use crate::services::{
    assets::{CreateAssetInput, UpdateAssetInput},
    assignments::AssignAssetInput,
    maintenance::ScheduleMaintenanceInput,
    returns::SubmitReturnInput,
    shipments::CreateShipmentInput,
};
use async_graphql::{Context, FieldResult, InputObject, Object, ID};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Root mutation object for GraphQL
pub struct Mutation;

fn parse_id(id: &ID) -> FieldResult<Uuid> {
    Uuid::parse_str(id).map_err(|e| async_graphql::Error::new(format!("Invalid UUID: {}", e)))
}

/// Mutations require a writer: admins, or anyone whose role grants the
/// relevant write permission (managers). Viewers are read-only.
fn require_writer(ctx: &Context<'_>) -> FieldResult<()> {
    let user = ctx
        .data_opt::<AuthUser>()
        .ok_or_else(|| async_graphql::Error::new("Authentication required"))?;

    if user.is_admin() || user.role == "manager" {
        Ok(())
    } else {
        Err(async_graphql::Error::new(
            "Insufficient permissions for mutations",
        ))
    }
}

#[derive(InputObject)]
pub struct CreateAssetGqlInput {
    pub asset_tag: String,
    pub name: String,
    pub description: Option<String>,
    /// laptop, monitor, phone, tablet, vehicle, tool, furniture, or other
    pub category: String,
    pub serial_number: Option<String>,
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub purchase_price: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateAssetGqlInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct AssignAssetGqlInput {
    pub asset_id: ID,
    pub holder_id: ID,
    pub due_at: Option<DateTime<Utc>>,
    pub condition_out: Option<String>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct ScheduleMaintenanceGqlInput {
    pub asset_id: ID,
    /// preventive, repair, inspection, or calibration
    pub maintenance_type: String,
    pub description: String,
    pub performed_by: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(InputObject)]
pub struct CreateShipmentGqlInput {
    pub asset_id: ID,
    pub tracking_number: String,
    /// ups, fedex, usps, dhl, or other
    pub carrier: String,
    pub origin: String,
    pub destination: String,
    pub recipient_name: String,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct SubmitReturnGqlInput {
    pub assignment_id: ID,
    pub requested_by: String,
    pub reason: String,
}

#[Object]
impl Mutation {
    /// Register a new asset
    async fn create_asset(
        &self,
        ctx: &Context<'_>,
        input: CreateAssetGqlInput,
    ) -> FieldResult<Asset> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;

        let category = input
            .category
            .parse::<asset::AssetCategory>()
            .map_err(async_graphql::Error::new)?;

        let created = context
            .services
            .assets
            .create_asset(CreateAssetInput {
                asset_tag: input.asset_tag,
                name: input.name,
                description: input.description,
                category,
                serial_number: input.serial_number,
                location: input.location,
                purchase_date: input.purchase_date,
                purchase_price: input.purchase_price,
                warranty_until: None,
                notes: input.notes,
            })
            .await?;

        Ok(created.into())
    }

    /// Update an asset's descriptive fields
    async fn update_asset(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateAssetGqlInput,
    ) -> FieldResult<Asset> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;

        let updated = context
            .services
            .assets
            .update_asset(
                parse_id(&id)?,
                UpdateAssetInput {
                    name: input.name,
                    description: input.description,
                    serial_number: input.serial_number,
                    location: input.location,
                    notes: input.notes,
                    warranty_until: None,
                },
            )
            .await?;

        Ok(updated.into())
    }

    /// Retire an asset
    async fn retire_asset(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Asset> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let updated = context.services.assets.retire_asset(parse_id(&id)?).await?;
        Ok(updated.into())
    }

    /// Hand an asset to a holder
    async fn assign_asset(
        &self,
        ctx: &Context<'_>,
        input: AssignAssetGqlInput,
    ) -> FieldResult<Assignment> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;

        let created = context
            .services
            .assignments
            .assign_asset(AssignAssetInput {
                asset_id: parse_id(&input.asset_id)?,
                holder_id: parse_id(&input.holder_id)?,
                due_at: input.due_at,
                condition_out: input.condition_out,
                notes: input.notes,
            })
            .await?;

        Ok(created.into())
    }

    /// Close an assignment and release the asset
    async fn return_asset(
        &self,
        ctx: &Context<'_>,
        assignment_id: ID,
        condition_in: Option<String>,
    ) -> FieldResult<Assignment> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;

        let updated = context
            .services
            .assignments
            .mark_returned(parse_id(&assignment_id)?, condition_in)
            .await?;

        Ok(updated.into())
    }

    /// Schedule maintenance on an asset
    async fn schedule_maintenance(
        &self,
        ctx: &Context<'_>,
        input: ScheduleMaintenanceGqlInput,
    ) -> FieldResult<MaintenanceLog> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;

        let maintenance_type = input
            .maintenance_type
            .parse::<maintenance_log::MaintenanceType>()
            .map_err(async_graphql::Error::new)?;

        let created = context
            .services
            .maintenance
            .schedule(ScheduleMaintenanceInput {
                asset_id: parse_id(&input.asset_id)?,
                maintenance_type,
                description: input.description,
                performed_by: input.performed_by,
                scheduled_for: input.scheduled_for,
            })
            .await?;

        Ok(created.into())
    }

    /// Mark a maintenance log started
    async fn start_maintenance(&self, ctx: &Context<'_>, id: ID) -> FieldResult<MaintenanceLog> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let updated = context.services.maintenance.start(parse_id(&id)?).await?;
        Ok(updated.into())
    }

    /// Complete a maintenance log
    async fn complete_maintenance(
        &self,
        ctx: &Context<'_>,
        id: ID,
        cost: Option<Decimal>,
        performed_by: Option<String>,
    ) -> FieldResult<MaintenanceLog> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let updated = context
            .services
            .maintenance
            .complete(parse_id(&id)?, cost, performed_by)
            .await?;
        Ok(updated.into())
    }

    /// Create a shipment for an asset
    async fn create_shipment(
        &self,
        ctx: &Context<'_>,
        input: CreateShipmentGqlInput,
    ) -> FieldResult<Shipment> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;

        let carrier = input
            .carrier
            .parse::<shipment::ShippingCarrier>()
            .map_err(async_graphql::Error::new)?;

        let created = context
            .services
            .shipments
            .create_shipment(CreateShipmentInput {
                asset_id: parse_id(&input.asset_id)?,
                tracking_number: input.tracking_number,
                carrier,
                origin: input.origin,
                destination: input.destination,
                recipient_name: input.recipient_name,
                estimated_delivery: input.estimated_delivery,
                notes: input.notes,
            })
            .await?;

        Ok(created.into())
    }

    /// Dispatch a pending shipment
    async fn dispatch_shipment(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Shipment> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let updated = context.services.shipments.dispatch(parse_id(&id)?).await?;
        Ok(updated.into())
    }

    /// Mark a shipment delivered
    async fn deliver_shipment(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Shipment> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let updated = context
            .services
            .shipments
            .mark_delivered(parse_id(&id)?)
            .await?;
        Ok(updated.into())
    }

    /// Submit a return request for an open assignment
    async fn submit_return_request(
        &self,
        ctx: &Context<'_>,
        input: SubmitReturnGqlInput,
    ) -> FieldResult<ReturnRequest> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;

        let created = context
            .services
            .returns
            .submit(SubmitReturnInput {
                assignment_id: parse_id(&input.assignment_id)?,
                requested_by: input.requested_by,
                reason: input.reason,
            })
            .await?;

        Ok(created.into())
    }

    /// Approve a pending return request
    async fn approve_return_request(
        &self,
        ctx: &Context<'_>,
        id: ID,
        resolution_notes: Option<String>,
    ) -> FieldResult<ReturnRequest> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let updated = context
            .services
            .returns
            .approve(parse_id(&id)?, resolution_notes)
            .await?;
        Ok(updated.into())
    }

    /// Reject a pending return request
    async fn reject_return_request(
        &self,
        ctx: &Context<'_>,
        id: ID,
        resolution_notes: Option<String>,
    ) -> FieldResult<ReturnRequest> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let updated = context
            .services
            .returns
            .reject(parse_id(&id)?, resolution_notes)
            .await?;
        Ok(updated.into())
    }

    /// Complete an approved return request, closing its assignment
    async fn complete_return_request(
        &self,
        ctx: &Context<'_>,
        id: ID,
        condition_in: Option<String>,
    ) -> FieldResult<ReturnRequest> {
        require_writer(ctx)?;
        let context = ctx.data::<GraphQLContext>()?;
        let updated = context
            .services
            .returns
            .complete(parse_id(&id)?, condition_in)
            .await?;
        Ok(updated.into())
    }
}
