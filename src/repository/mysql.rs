use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::MySqlPool;
use tracing::debug;

use super::{RepositoryError, RequestRepository, RequestRow, group_rows};
use crate::model::leave_request::{LeaveRequest, NewLeaveRequest, RequestStatus, UserLeaveSummary};

const REQUEST_COLUMNS: &str = r#"
    SELECT
        z.id,
        u.ime,
        u.priimek,
        u.email,
        z.datum_zahteve,
        z.stanje,
        z.komentar,
        t.naziv AS tip_dopusta,
        d.zacetek,
        d.konec,
        d.razlog
    FROM zahteva z
    JOIN uporabnik u ON u.id = z.uporabnik_id
    LEFT JOIN dopust d ON d.zahteva_id = z.id
    LEFT JOIN tip_dopusta t ON t.id = d.tip_dopusta_id
"#;

#[derive(Clone)]
pub struct MySqlRequestRepository {
    pool: MySqlPool,
}

impl MySqlRequestRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_rows(&self, sql: &str, user_id: Option<u64>) -> Result<Vec<RequestRow>, RepositoryError> {
        let mut query = sqlx::query_as::<_, RequestRow>(sql);
        if let Some(user_id) = user_id {
            query = query.bind(user_id);
        }

        let mut stream = query.fetch(&self.pool);
        let mut rows = Vec::new();
        while let Some(row) = stream.try_next().await? {
            rows.push(row);
        }

        debug!(rows = rows.len(), "Fetched leave request rows");
        Ok(rows)
    }

    async fn exists(&self, id: u64) -> Result<bool, RepositoryError> {
        // EXISTS comes back as BIGINT, not TINYINT(1)
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM zahteva WHERE id = ? LIMIT 1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists > 0)
    }
}

#[async_trait]
impl RequestRepository for MySqlRequestRepository {
    async fn fetch_grouped(&self) -> Result<Vec<LeaveRequest>, RepositoryError> {
        let sql = format!("{REQUEST_COLUMNS} ORDER BY u.id, z.datum_zahteve DESC, z.id, d.id");
        group_rows(self.fetch_rows(&sql, None).await?)
    }

    async fn fetch_for_user(&self, user_id: u64) -> Result<Vec<LeaveRequest>, RepositoryError> {
        let sql = format!(
            "{REQUEST_COLUMNS} WHERE z.uporabnik_id = ? ORDER BY z.datum_zahteve DESC, z.id, d.id"
        );
        group_rows(self.fetch_rows(&sql, Some(user_id)).await?)
    }

    async fn update_status(&self, id: u64, status: RequestStatus) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE zahteva SET stanje = ? WHERE id = ?")
            .bind(status.as_ref())
            .bind(id)
            .execute(&self.pool)
            .await?;

        // MySQL reports 0 affected rows when the value did not change.
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        self.exists(id).await
    }

    async fn update_comment(&self, id: u64, comment: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE zahteva SET komentar = ? WHERE id = ?")
            .bind(comment)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        self.exists(id).await
    }

    async fn status_summary(&self) -> Result<Vec<UserLeaveSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, (String, String, String, u64, u64, u64)>(
            r#"
            SELECT
                u.ime,
                u.priimek,
                u.email,
                CAST(COALESCE(SUM(z.stanje = 'Accepted'), 0) AS UNSIGNED),
                CAST(COALESCE(SUM(z.stanje = 'Denied'), 0) AS UNSIGNED),
                CAST(COALESCE(SUM(z.stanje = 'In Progress'), 0) AS UNSIGNED)
            FROM uporabnik u
            LEFT JOIN zahteva z ON z.uporabnik_id = u.id
            GROUP BY u.id, u.ime, u.priimek, u.email
            ORDER BY u.priimek, u.ime
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(ime, priimek, email, accepted, denied, in_progress)| UserLeaveSummary {
                ime,
                priimek,
                email,
                odobreni_dopusti: accepted,
                zavrnjeni_dopusti: denied,
                dopusti_v_obdelavi: in_progress,
            })
            .collect())
    }

    async fn create(&self, user_id: u64, request: &NewLeaveRequest) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO zahteva (uporabnik_id, datum_zahteve, stanje, komentar)
            VALUES (?, CURDATE(), ?, '')
            "#,
        )
        .bind(user_id)
        .bind(RequestStatus::InProgress.as_ref())
        .execute(&mut *tx)
        .await?;
        let request_id = inserted.last_insert_id();

        for detail in &request.dopusti {
            let result = sqlx::query(
                r#"
                INSERT INTO dopust (zahteva_id, tip_dopusta_id, zacetek, konec, razlog)
                SELECT ?, t.id, ?, ?, ?
                FROM tip_dopusta t
                WHERE t.naziv = ?
                "#,
            )
            .bind(request_id)
            .bind(detail.zacetek)
            .bind(detail.konec)
            .bind(&detail.razlog)
            .bind(&detail.tip_dopusta)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // dropping `tx` rolls the request row back
                return Err(RepositoryError::UnknownLeaveType(detail.tip_dopusta.clone()));
            }
        }

        tx.commit().await?;
        Ok(request_id)
    }
}
