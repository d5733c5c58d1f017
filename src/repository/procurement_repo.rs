// ==========================================
// 设备交付项目门禁系统 - BOM / 外协数据仓储
// ==========================================
// 表: bom_header / bom_item / material
//     outsourcing_order / outsourcing_order_item
// ==========================================

use crate::domain::procurement::{BomHeader, BomItemLine, OutsourcingOrder};
use crate::domain::types::{BomStatus, OutsourcingStatus};
use crate::repository::error::RepositoryResult;
use crate::repository::sql_utils::{lock_conn, parse_code, SharedConnection};
use rusqlite::{params, OptionalExtension};

// ==========================================
// BomReader - BOM 只读接口
// ==========================================
pub trait BomReader: Send + Sync {
    /// 统计项目下已发布的 BOM 数量（含设备级）
    fn count_released_for_project(&self, project_id: &str) -> RepositoryResult<usize>;

    /// 查询设备最近发布的 BOM
    fn find_released_for_machine(&self, machine_id: &str) -> RepositoryResult<Option<BomHeader>>;

    /// 查询 BOM 明细（已关联物料库存）
    fn list_item_lines(&self, bom_id: &str) -> RepositoryResult<Vec<BomItemLine>>;
}

// ==========================================
// OutsourcingReader - 外协单只读接口
// ==========================================
pub trait OutsourcingReader: Send + Sync {
    /// 查询外协单
    ///
    /// - machine_id = Some: 该设备的外协单
    /// - machine_id = None: 未关联设备的项目级外协单
    fn list_orders(
        &self,
        project_id: &str,
        machine_id: Option<&str>,
    ) -> RepositoryResult<Vec<OutsourcingOrder>>;
}

// ==========================================
// ProcurementRepository - SQLite 实现
// ==========================================
pub struct ProcurementRepository {
    conn: SharedConnection,
}

impl ProcurementRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl BomReader for ProcurementRepository {
    fn count_released_for_project(&self, project_id: &str) -> RepositoryResult<usize> {
        let conn = lock_conn(&self.conn)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM bom_header WHERE project_id = ?1 AND status = ?2",
            params![project_id, BomStatus::Released.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn find_released_for_machine(&self, machine_id: &str) -> RepositoryResult<Option<BomHeader>> {
        let conn = lock_conn(&self.conn)?;
        let header = conn
            .query_row(
                r#"
                SELECT id, project_id, machine_id, bom_no
                FROM bom_header
                WHERE machine_id = ?1 AND status = ?2
                ORDER BY id DESC
                LIMIT 1
                "#,
                params![machine_id, BomStatus::Released.as_str()],
                |row| {
                    Ok(BomHeader {
                        id: row.get(0)?,
                        project_id: row.get(1)?,
                        machine_id: row.get(2)?,
                        bom_no: row.get(3)?,
                        status: BomStatus::Released,
                    })
                },
            )
            .optional()?;
        Ok(header)
    }

    fn list_item_lines(&self, bom_id: &str) -> RepositoryResult<Vec<BomItemLine>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                i.id, i.bom_id, m.material_code, m.material_name,
                i.quantity, COALESCE(i.unit_price, m.unit_price),
                COALESCE(m.current_stock, 0), COALESCE(m.received_qty, 0),
                COALESCE(m.is_key_material, 0), m.category
            FROM bom_item i
            JOIN material m ON m.id = i.material_id
            WHERE i.bom_id = ?1
            ORDER BY i.id
            "#,
        )?;

        let lines = stmt
            .query_map(params![bom_id], |row| {
                Ok(BomItemLine {
                    item_id: row.get(0)?,
                    bom_id: row.get(1)?,
                    material_code: row.get(2)?,
                    material_name: row.get(3)?,
                    quantity: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
                    unit_price: row.get(5)?,
                    current_stock: row.get(6)?,
                    received_qty: row.get(7)?,
                    is_key_material: row.get::<_, i64>(8)? != 0,
                    category: row.get(9)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lines)
    }
}

impl OutsourcingReader for ProcurementRepository {
    fn list_orders(
        &self,
        project_id: &str,
        machine_id: Option<&str>,
    ) -> RepositoryResult<Vec<OutsourcingOrder>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                o.id, o.order_no, o.project_id, o.machine_id, o.status,
                COALESCE(SUM(it.ordered_qty), 0), COALESCE(SUM(it.delivered_qty), 0)
            FROM outsourcing_order o
            LEFT JOIN outsourcing_order_item it ON it.order_id = o.id
            WHERE o.project_id = ?1
              AND ((?2 IS NULL AND o.machine_id IS NULL) OR o.machine_id = ?2)
            GROUP BY o.id, o.order_no, o.project_id, o.machine_id, o.status
            ORDER BY o.order_no
            "#,
        )?;

        let rows = stmt
            .query_map(params![project_id, machine_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, f64>(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, order_no, project_id, machine_id, status, ordered, delivered)| {
                Ok(OutsourcingOrder {
                    id,
                    order_no,
                    project_id,
                    machine_id,
                    status: parse_code(
                        "outsourcing_order.status",
                        &status,
                        OutsourcingStatus::from_code,
                    )?,
                    ordered_qty: ordered,
                    delivered_qty: delivered,
                })
            })
            .collect()
    }
}
