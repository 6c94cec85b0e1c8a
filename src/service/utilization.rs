use crate::endpoints::warehouse::WarehouseEndpoints;
use crate::error::app_error::ClientError;
use crate::models::batch::Batch;
use crate::models::utilization::{UtilizationReport, WarehouseUtilization};
use crate::models::warehouse::Warehouse;
use crate::service::service_util::{percent_of, total};
use futures::future::join_all;
use tracing::{debug, warn};

pub fn occupancy_of(batches: &[Batch]) -> f64 {
    total(batches.iter().map(|b| b.quantity))
}

pub fn utilization_of(warehouse: &Warehouse, batches: &[Batch]) -> WarehouseUtilization {
    let capacity = warehouse.storage_capacity;
    let occupied = occupancy_of(batches);

    WarehouseUtilization {
        warehouse_id: warehouse.id.clone(),
        name: warehouse.display_name().to_string(),
        normalized_capacity: capacity,
        current_occupancy: occupied,
        utilization_percent: percent_of(occupied, capacity),
    }
}

/// Per-warehouse and global utilization. The global figure is total occupancy
/// over total capacity, not the mean of the per-warehouse percentages.
pub fn aggregate(entries: &[(Warehouse, Vec<Batch>)]) -> UtilizationReport {
    let warehouses: Vec<WarehouseUtilization> = entries.iter().map(|(w, batches)| utilization_of(w, batches)).collect();
    let total_capacity = total(warehouses.iter().map(|u| u.normalized_capacity));
    let total_occupied = total(warehouses.iter().map(|u| u.current_occupancy));

    UtilizationReport {
        warehouses,
        total_capacity,
        total_occupied,
        global_utilization: percent_of(total_occupied, total_capacity),
    }
}

/// Lists warehouses, fetches every batch list concurrently and aggregates.
///
/// A failed batch fetch counts that warehouse as empty. Only an expired session
/// aborts, after all fetches have settled.
pub async fn collect_utilization<E>(endpoints: &E) -> Result<UtilizationReport, ClientError>
where
    E: WarehouseEndpoints + ?Sized,
{
    let overview = endpoints.list_warehouses().await?;
    let results = join_all(overview.warehouses.iter().map(|w| batches_for(endpoints, w))).await;

    let mut session_expired = false;
    let entries: Vec<(Warehouse, Vec<Batch>)> = overview
        .warehouses
        .into_iter()
        .zip(results)
        .map(|(warehouse, result)| {
            let batches = match result {
                Ok(batches) => batches,
                Err(ClientError::SessionExpired) => {
                    session_expired = true;
                    Vec::new()
                }
                Err(e) => {
                    warn!(warehouse_id = ?warehouse.id, error = %e, "failed to fetch batches, counting warehouse as empty");
                    Vec::new()
                }
            };
            (warehouse, batches)
        })
        .collect();

    if session_expired {
        return Err(ClientError::SessionExpired);
    }

    Ok(aggregate(&entries))
}

async fn batches_for<E>(endpoints: &E, warehouse: &Warehouse) -> Result<Vec<Batch>, ClientError>
where
    E: WarehouseEndpoints + ?Sized,
{
    let Some(warehouse_id) = warehouse.id.as_deref() else {
        debug!(name = %warehouse.display_name(), "warehouse has no id, skipping batch fetch");
        return Ok(Vec::new());
    };

    Ok(endpoints.warehouse_detail(warehouse_id).await?.batches)
}
