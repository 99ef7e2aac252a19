use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{
    Asset, AssetHolder, Assignment, Customer, MaintenanceLog, Order, Product, ReturnRequest,
    Shipment,
};
use crate::services::{
    assets::AssetFilter, assignments::AssignmentFilter, maintenance::MaintenanceFilter,
};
use async_graphql::{Context, FieldResult, Object, ID};
use uuid::Uuid;

/// Root query object for GraphQL
pub struct Query;

fn parse_id(id: &ID) -> FieldResult<Uuid> {
    Uuid::parse_str(id).map_err(|e| async_graphql::Error::new(format!("Invalid UUID: {}", e)))
}

fn page_args(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    (page.unwrap_or(1).max(1), limit.unwrap_or(20).clamp(1, 100))
}

#[Object]
impl Query {
    /// Fetch one asset by ID
    async fn asset(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Asset>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context.services.assets.get_asset(parse_id(&id)?).await?;
        Ok(found.map(Into::into))
    }

    /// Fetch one asset by its tag
    async fn asset_by_tag(&self, ctx: &Context<'_>, tag: String) -> FieldResult<Option<Asset>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context.services.assets.get_asset_by_tag(&tag).await?;
        Ok(found.map(Into::into))
    }

    /// List assets with optional status/category/search filters
    async fn assets(
        &self,
        ctx: &Context<'_>,
        page: Option<u64>,
        limit: Option<u64>,
        status: Option<String>,
        category: Option<String>,
        search: Option<String>,
    ) -> FieldResult<Vec<Asset>> {
        let context = ctx.data::<GraphQLContext>()?;
        let (page, limit) = page_args(page, limit);

        let (records, _total) = context
            .services
            .assets
            .list_assets(
                page,
                limit,
                AssetFilter {
                    status,
                    category,
                    search,
                },
            )
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Fetch one holder by ID
    async fn asset_holder(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<AssetHolder>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context.services.holders.get_holder(parse_id(&id)?).await?;
        Ok(found.map(Into::into))
    }

    /// List holders; inactive entries are included when `include_inactive`
    async fn asset_holders(
        &self,
        ctx: &Context<'_>,
        page: Option<u64>,
        limit: Option<u64>,
        include_inactive: Option<bool>,
        search: Option<String>,
    ) -> FieldResult<Vec<AssetHolder>> {
        let context = ctx.data::<GraphQLContext>()?;
        let (page, limit) = page_args(page, limit);

        let (records, _total) = context
            .services
            .holders
            .list_holders(page, limit, !include_inactive.unwrap_or(false), search)
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// List assignments filtered by asset, holder, or status
    async fn assignments(
        &self,
        ctx: &Context<'_>,
        page: Option<u64>,
        limit: Option<u64>,
        asset_id: Option<ID>,
        holder_id: Option<ID>,
        status: Option<String>,
    ) -> FieldResult<Vec<Assignment>> {
        let context = ctx.data::<GraphQLContext>()?;
        let (page, limit) = page_args(page, limit);

        let filter = AssignmentFilter {
            asset_id: asset_id.as_ref().map(parse_id).transpose()?,
            holder_id: holder_id.as_ref().map(parse_id).transpose()?,
            status,
        };

        let (records, _total) = context
            .services
            .assignments
            .list_assignments(page, limit, filter)
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// List maintenance logs filtered by asset or status
    async fn maintenance_logs(
        &self,
        ctx: &Context<'_>,
        page: Option<u64>,
        limit: Option<u64>,
        asset_id: Option<ID>,
        status: Option<String>,
    ) -> FieldResult<Vec<MaintenanceLog>> {
        let context = ctx.data::<GraphQLContext>()?;
        let (page, limit) = page_args(page, limit);

        let filter = MaintenanceFilter {
            asset_id: asset_id.as_ref().map(parse_id).transpose()?,
            status,
        };

        let (records, _total) = context
            .services
            .maintenance
            .list_logs(page, limit, filter)
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Fetch one shipment by ID
    async fn shipment(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Shipment>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context
            .services
            .shipments
            .get_shipment(parse_id(&id)?)
            .await?;
        Ok(found.map(Into::into))
    }

    /// List shipments with an optional status filter
    async fn shipments(
        &self,
        ctx: &Context<'_>,
        page: Option<u64>,
        limit: Option<u64>,
        status: Option<String>,
    ) -> FieldResult<Vec<Shipment>> {
        let context = ctx.data::<GraphQLContext>()?;
        let (page, limit) = page_args(page, limit);

        let (records, _total) = context
            .services
            .shipments
            .list_shipments(page, limit, status)
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Fetch one return request by ID
    async fn return_request(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<ReturnRequest>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context.services.returns.get_request(parse_id(&id)?).await?;
        Ok(found.map(Into::into))
    }

    /// List return requests with an optional status filter
    async fn return_requests(
        &self,
        ctx: &Context<'_>,
        page: Option<u64>,
        limit: Option<u64>,
        status: Option<String>,
    ) -> FieldResult<Vec<ReturnRequest>> {
        let context = ctx.data::<GraphQLContext>()?;
        let (page, limit) = page_args(page, limit);

        let (records, _total) = context
            .services
            .returns
            .list_requests(page, limit, status)
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Fetch one customer by ID
    async fn customer(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Customer>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context
            .services
            .customers
            .get_customer(parse_id(&id)?)
            .await?;
        Ok(found.map(Into::into))
    }

    /// List customers with an optional search term
    async fn customers(
        &self,
        ctx: &Context<'_>,
        page: Option<u64>,
        limit: Option<u64>,
        search: Option<String>,
    ) -> FieldResult<Vec<Customer>> {
        let context = ctx.data::<GraphQLContext>()?;
        let (page, limit) = page_args(page, limit);

        let (records, _total) = context
            .services
            .customers
            .list_customers(page, limit, search)
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Fetch one product by ID
    async fn product(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Product>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context.services.products.get_product(parse_id(&id)?).await?;
        Ok(found.map(Into::into))
    }

    /// List products with an optional search term
    async fn products(
        &self,
        ctx: &Context<'_>,
        page: Option<u64>,
        limit: Option<u64>,
        active_only: Option<bool>,
        search: Option<String>,
    ) -> FieldResult<Vec<Product>> {
        let context = ctx.data::<GraphQLContext>()?;
        let (page, limit) = page_args(page, limit);

        let (records, _total) = context
            .services
            .products
            .list_products(page, limit, active_only.unwrap_or(false), search)
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Fetch one order by ID
    async fn order(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Order>> {
        let context = ctx.data::<GraphQLContext>()?;
        let found = context.services.orders.get_order(parse_id(&id)?).await?;
        Ok(found.map(|(order, _items)| order.into()))
    }

    /// List orders filtered by customer or status
    async fn orders(
        &self,
        ctx: &Context<'_>,
        page: Option<u64>,
        limit: Option<u64>,
        customer_id: Option<ID>,
        status: Option<String>,
    ) -> FieldResult<Vec<Order>> {
        let context = ctx.data::<GraphQLContext>()?;
        let (page, limit) = page_args(page, limit);

        let customer_id = customer_id.as_ref().map(parse_id).transpose()?;

        let (records, _total) = context
            .services
            .orders
            .list_orders(page, limit, customer_id, status)
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}
