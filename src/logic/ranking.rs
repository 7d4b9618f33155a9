//! Ranking service: demotion, category swaps and points live in remote procedures.
//! This side only names the procedure, sends parameters and hands back the reply.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days without a match after which the ranking service may demote a player.
pub const DEFAULT_INACTIVITY_DAYS: u32 = 30;

/// Calendar month a recalculation applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingPeriod {
    pub year: i32,
    pub month: u32,
}

impl RankingPeriod {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct InactivityDemotionParams {
    pub reference_date: NaiveDate,
    pub inactivity_days: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct CategorySwapParams {
    pub year: i32,
    pub month: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ProMasterPointsParams {
    pub year: i32,
    pub month: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct MonthlyRankingParams {
    pub year: i32,
    pub month: u32,
}

/// Reply of one procedure call, kept opaque.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcedureReport {
    pub procedure: String,
    pub payload: serde_json::Value,
}

/// Errors from calling the ranking service.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RankingError {
    /// Request never got an answer (connection, TLS, timeout).
    Transport(String),
    /// The service answered with a non-success status.
    Rejected {
        procedure: String,
        status: u16,
        body: String,
    },
    /// The reply was not JSON.
    Decode(String),
}

impl std::fmt::Display for RankingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingError::Transport(e) => write!(f, "Ranking service unreachable: {}", e),
            RankingError::Rejected {
                procedure,
                status,
                body,
            } => write!(f, "Ranking procedure {} failed with status {}: {}", procedure, status, body),
            RankingError::Decode(e) => write!(f, "Invalid ranking service reply: {}", e),
        }
    }
}

impl std::error::Error for RankingError {}

/// One method per remote procedure.
#[async_trait]
pub trait RankingService: Send + Sync {
    async fn calculate_inactivity_demotion(
        &self,
        params: InactivityDemotionParams,
    ) -> Result<ProcedureReport, RankingError>;

    async fn process_category_swaps(
        &self,
        params: CategorySwapParams,
    ) -> Result<ProcedureReport, RankingError>;

    async fn calculate_pro_master_points(
        &self,
        params: ProMasterPointsParams,
    ) -> Result<ProcedureReport, RankingError>;

    async fn recalculate_monthly_rankings(
        &self,
        params: MonthlyRankingParams,
    ) -> Result<ProcedureReport, RankingError>;
}

/// Calls procedures as `POST {base_url}/rpc/{name}` with the parameters as a JSON body.
pub struct RpcRankingService {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl RpcRankingService {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn procedure_url(&self, procedure: &str) -> String {
        format!("{}/rpc/{}", self.base_url.trim_end_matches('/'), procedure)
    }

    async fn call<P: Serialize + Sync>(
        &self,
        procedure: &str,
        params: &P,
    ) -> Result<ProcedureReport, RankingError> {
        let url = self.procedure_url(procedure);
        log::debug!("Calling ranking procedure {}", url);
        let mut request = self.client.post(&url).json(params);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| RankingError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RankingError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(RankingError::Rejected {
                procedure: procedure.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        let payload = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| RankingError::Decode(e.to_string()))?
        };
        Ok(ProcedureReport {
            procedure: procedure.to_string(),
            payload,
        })
    }
}

#[async_trait]
impl RankingService for RpcRankingService {
    async fn calculate_inactivity_demotion(
        &self,
        params: InactivityDemotionParams,
    ) -> Result<ProcedureReport, RankingError> {
        self.call("calculate_inactivity_demotion", &params).await
    }

    async fn process_category_swaps(
        &self,
        params: CategorySwapParams,
    ) -> Result<ProcedureReport, RankingError> {
        self.call("process_category_swaps", &params).await
    }

    async fn calculate_pro_master_points(
        &self,
        params: ProMasterPointsParams,
    ) -> Result<ProcedureReport, RankingError> {
        self.call("calculate_pro_master_points", &params).await
    }

    async fn recalculate_monthly_rankings(
        &self,
        params: MonthlyRankingParams,
    ) -> Result<ProcedureReport, RankingError> {
        self.call("recalculate_monthly_rankings", &params).await
    }
}

/// Admin "run monthly recalculation": demotions, then swaps, then points, then rankings.
/// Stops at the first failing procedure.
pub async fn run_monthly_cycle<S: RankingService + ?Sized>(
    service: &S,
    period: RankingPeriod,
    reference_date: NaiveDate,
    inactivity_days: u32,
) -> Result<Vec<ProcedureReport>, RankingError> {
    let RankingPeriod { year, month } = period;
    let mut reports = Vec::with_capacity(4);
    reports.push(
        service
            .calculate_inactivity_demotion(InactivityDemotionParams {
                reference_date,
                inactivity_days,
            })
            .await?,
    );
    reports.push(service.process_category_swaps(CategorySwapParams { year, month }).await?);
    reports.push(
        service
            .calculate_pro_master_points(ProMasterPointsParams { year, month })
            .await?,
    );
    reports.push(
        service
            .recalculate_monthly_rankings(MonthlyRankingParams { year, month })
            .await?,
    );
    log::info!("Monthly ranking cycle {}-{:02} finished", year, month);
    Ok(reports)
}
