//! In-memory backends for workflow tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sylithe_analysis_models::{
    AreaOfInterest, Baseline, ChangeResult, ChmResult, DacbResult, LeakageResult, LockReceipt,
    LulcResult, RiskResult, Timeline,
};
use sylithe_client::{AnalysisApi, ChmApi, ClientError};
use tokio::sync::Notify;

pub mod fixtures {
    use serde_json::json;
    use sylithe_analysis_models::{
        AreaOfInterest, Baseline, ChangeResult, ChmResult, DacbResult, LeakageResult, LulcResult,
        RiskResult, Timeline,
    };

    fn square(lng: f64, lat: f64) -> AreaOfInterest {
        let value = json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [lng, lat],
                    [lng + 0.1, lat],
                    [lng + 0.1, lat + 0.1],
                    [lng, lat + 0.1],
                    [lng, lat]
                ]]
            }
        });
        AreaOfInterest::parse(&value.to_string()).unwrap()
    }

    pub fn aoi() -> AreaOfInterest {
        square(77.5, 12.9)
    }

    pub fn other_aoi() -> AreaOfInterest {
        square(76.0, 11.0)
    }

    pub fn lulc(year: i32) -> LulcResult {
        serde_json::from_value(json!({
            "tile_url": format!("lulc-{year}"),
            "stats": {"0": 100, "1": 600, "4": 200, "6": 100},
            "aoi_area_km2": 12.345
        }))
        .unwrap()
    }

    pub fn timeline() -> Timeline {
        let years: Vec<_> = (2018..=2023)
            .map(|year| {
                json!({
                    "year": year,
                    "tile_url": format!("timeline-{year}"),
                    "stats": {"1": 600 - (year - 2018) * 10, "6": 100 + (year - 2018) * 10}
                })
            })
            .collect();
        serde_json::from_value(json!({"timeline": years, "aoi_area_km2": 12.345})).unwrap()
    }

    pub fn baseline() -> Baseline {
        serde_json::from_value(json!({
            "baseline_id": "b1",
            "baseline_year": 2019,
            "area_km2": 12.345,
            "locked": false,
            "created_at": "2024-01-15T10:30:00",
            "tile_url": "baseline-2019",
            "stats": {"0": 100, "1": 600, "4": 200, "6": 100}
        }))
        .unwrap()
    }

    pub fn change() -> ChangeResult {
        serde_json::from_value(json!({
            "baseline_year": 2019,
            "current_year": 2023,
            "years_elapsed": 4,
            "changes": {
                "0": {
                    "class_name": "Water",
                    "baseline_pct": 10.0,
                    "current_pct": 5.0,
                    "current_km2": 0.62,
                    "change_km2": -0.62,
                    "change_pct": -5.0
                },
                "1": {
                    "class_name": "Trees",
                    "baseline_pct": 60.0,
                    "current_pct": 55.5,
                    "current_km2": 6.85,
                    "change_km2": -0.56,
                    "change_pct": -4.5
                },
                "6": {
                    "class_name": "Built Area",
                    "baseline_pct": 10.0,
                    "current_pct": 19.5,
                    "current_km2": 2.41,
                    "change_km2": 1.17,
                    "change_pct": 9.5
                }
            },
            "transitions": {
                "trees_to_built": {
                    "from_class": "Trees",
                    "to_class": "Built Area",
                    "area_km2": 0.56,
                    "description": "Trees converted to Built Area"
                }
            },
            "summary": {
                "significant_changes": [
                    {"class": "Built Area", "change": 9.5},
                    {"class": "Water", "change": -5.0},
                    {"class": "Trees", "change": -4.5}
                ],
                "total_classes_changed": 3
            },
            "current_tile_url": "change-2023"
        }))
        .unwrap()
    }

    pub fn risk() -> RiskResult {
        serde_json::from_value(json!({
            "risk_score": 72.0,
            "risk_level": "HIGH",
            "permanence_confidence": 28.0,
            "flags": [{
                "type": "forest_loss",
                "severity": "HIGH",
                "score_impact": 30,
                "reason": "Tree cover fell by 4.5%",
                "explanation": "Forest cover declined since the baseline year.",
                "recommendation": "Investigate clearing activity."
            }],
            "total_flags": 1,
            "critical_flags": 0,
            "high_flags": 1,
            "summary": {
                "verdict": "HIGH RISK",
                "message": "Significant reversal risk",
                "action": "Field verification recommended"
            }
        }))
        .unwrap()
    }

    pub fn leakage() -> LeakageResult {
        serde_json::from_value(json!({
            "leakage_detected": true,
            "leakage_severity": "HIGH",
            "leakage_ratio": 0.42,
            "project_area": {"area_km2": 12.3, "baseline_forest_pct": 60.0, "current_forest_pct": 55.5, "deforestation_pct": 4.5},
            "buffer_zone": {"area_km2": 80.1, "baseline_forest_pct": 48.0, "current_forest_pct": 41.0, "deforestation_pct": 7.0},
            "buffer_km": 5.0,
            "summary": "Deforestation displaced into the buffer zone",
            "recommendation": "Apply a leakage deduction",
            "buffer_tile_url": "buffer-tile"
        }))
        .unwrap()
    }

    pub fn dacb() -> DacbResult {
        serde_json::from_value(json!({
            "baseline_model": "DACB",
            "baseline_year": 2019,
            "current_year": 2023,
            "years_elapsed": 4,
            "buffer_km": 5.0,
            "project_forest_baseline_km2": 7.41,
            "project_forest_current_km2": 6.85,
            "control_forest_baseline_km2": 38.4,
            "control_forest_current_km2": 32.8,
            "control_trend_km2_per_year": -1.4,
            "expected_forest_km2": 6.33,
            "observed_forest_km2": 6.85,
            "avoided_deforestation_km2": 0.52,
            "leakage_ratio": 0.42,
            "leakage_severity": "HIGH",
            "leakage_adjustment_factor": 0.58,
            "adjusted_avoided_deforestation_km2": 0.3,
            "permanence_score": 28.0,
            "control_area_quality": {
                "similarity_score": 0.82,
                "quality": "HIGH",
                "project_forest_pct": 60.0,
                "control_forest_pct": 48.0
            },
            "confidence": "MEDIUM",
            "control_selection": {"method": "BUFFER", "buffer_km": 5.0}
        }))
        .unwrap()
    }

    pub fn chm(year: i32) -> ChmResult {
        serde_json::from_value(json!({
            "status": "success",
            "year": year,
            "total_area_ha": 1234.5,
            "model_prediction": {"avg": 14.2, "min": 0.0, "max": 38.7, "std": 6.1},
            "eligibility": {
                "percentage": 72.4,
                "eligible_ha": 893.8,
                "ineligible_ha": 340.7,
                "breakdown": {"trees": 70.1, "mangroves": 2.3, "urban": 10.0, "water": 5.6, "other": 12.0}
            },
            "tree_count": {"total": 154_000, "per_hectare": 125}
        }))
        .unwrap()
    }
}

/// Pauses a mocked call until the test releases it.
#[derive(Clone)]
pub struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    pub fn new() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    /// Resolves once the gated call has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

fn status_error(status: u16) -> ClientError {
    let status_text = match status {
        400 => "Bad Request",
        404 => "Not Found",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Internal Server Error",
    };
    ClientError::Status {
        status,
        status_text: status_text.to_string(),
    }
}

/// Analysis backend answering with fixtures.
#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<String>>,
    failing: Mutex<BTreeMap<&'static str, u16>>,
    gates: Mutex<BTreeMap<&'static str, Gate>>,
    locked: AtomicBool,
    lock_ignored: AtomicBool,
}

impl MockApi {
    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Makes every later call to `method` answer with `status`.
    pub fn fail(&self, method: &'static str, status: u16) {
        self.failing.lock().unwrap().insert(method, status);
    }

    /// Pauses the next call to `method` on `gate`.
    pub fn gate(&self, method: &'static str, gate: Gate) {
        self.gates.lock().unwrap().insert(method, gate);
    }

    /// Whether a lock request is reflected by later `get_baseline` calls.
    pub fn set_lock_takes_effect(&self, takes_effect: bool) {
        self.lock_ignored.store(!takes_effect, Ordering::SeqCst);
    }

    async fn record(&self, method: &'static str, call: String) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        let gate = self.gates.lock().unwrap().remove(method);
        if let Some(gate) = gate {
            gate.pass().await;
        }
        let status = self.failing.lock().unwrap().get(method).copied();
        status.map_or(Ok(()), |status| Err(status_error(status)))
    }
}

#[async_trait::async_trait]
impl AnalysisApi for MockApi {
    async fn analyze_lulc(
        &self,
        _aoi: &AreaOfInterest,
        start_date: &str,
        end_date: &str,
    ) -> Result<LulcResult, ClientError> {
        self.record("analyze_lulc", format!("analyze_lulc {start_date}..{end_date}"))
            .await?;
        let year = start_date[..4].parse().unwrap();
        Ok(fixtures::lulc(year))
    }

    async fn analyze_timeline(
        &self,
        _aoi: &AreaOfInterest,
        start_year: i32,
        end_year: i32,
    ) -> Result<Timeline, ClientError> {
        self.record(
            "analyze_timeline",
            format!("analyze_timeline {start_year}..{end_year}"),
        )
        .await?;
        Ok(fixtures::timeline())
    }

    async fn create_baseline(
        &self,
        _aoi: &AreaOfInterest,
        baseline_year: i32,
    ) -> Result<Baseline, ClientError> {
        self.record("create_baseline", format!("create_baseline {baseline_year}"))
            .await?;
        self.locked.store(false, Ordering::SeqCst);
        Ok(Baseline {
            baseline_year,
            ..fixtures::baseline()
        })
    }

    async fn lock_baseline(
        &self,
        baseline_id: &str,
        locked_by: &str,
    ) -> Result<LockReceipt, ClientError> {
        self.record(
            "lock_baseline",
            format!("lock_baseline {baseline_id} by {locked_by}"),
        )
        .await?;
        if !self.lock_ignored.load(Ordering::SeqCst) {
            self.locked.store(true, Ordering::SeqCst);
        }
        Ok(LockReceipt {
            success: true,
            message: "Baseline locked successfully".to_string(),
            baseline_id: baseline_id.to_string(),
            locked_at: Some("2024-02-01T09:00:00".to_string()),
        })
    }

    async fn get_baseline(&self, baseline_id: &str) -> Result<Baseline, ClientError> {
        self.record("get_baseline", format!("get_baseline {baseline_id}"))
            .await?;
        let locked = self.locked.load(Ordering::SeqCst);
        Ok(Baseline {
            baseline_id: baseline_id.to_string(),
            locked,
            locked_at: locked.then(|| "2024-02-01T09:00:00".to_string()),
            ..fixtures::baseline()
        })
    }

    async fn detect_changes(
        &self,
        baseline_id: &str,
        current_year: i32,
        _aoi: &AreaOfInterest,
    ) -> Result<ChangeResult, ClientError> {
        self.record(
            "detect_changes",
            format!("detect_changes {baseline_id} {current_year}"),
        )
        .await?;
        Ok(fixtures::change())
    }

    async fn assess_risk(
        &self,
        baseline_id: &str,
        current_year: i32,
        _aoi: &AreaOfInterest,
    ) -> Result<RiskResult, ClientError> {
        self.record(
            "assess_risk",
            format!("assess_risk {baseline_id} {current_year}"),
        )
        .await?;
        Ok(fixtures::risk())
    }

    async fn analyze_leakage(
        &self,
        baseline_id: &str,
        current_year: i32,
        _aoi: &AreaOfInterest,
    ) -> Result<LeakageResult, ClientError> {
        self.record(
            "analyze_leakage",
            format!("analyze_leakage {baseline_id} {current_year}"),
        )
        .await?;
        Ok(fixtures::leakage())
    }

    async fn analyze_dacb(
        &self,
        _aoi: &AreaOfInterest,
        baseline_year: i32,
        current_year: i32,
        buffer_km: f64,
        use_knn: bool,
    ) -> Result<DacbResult, ClientError> {
        self.record(
            "analyze_dacb",
            format!("analyze_dacb {baseline_year}->{current_year} buffer {buffer_km} knn {use_knn}"),
        )
        .await?;
        Ok(fixtures::dacb())
    }
}

/// Canopy-height backend answering with fixtures.
#[derive(Default)]
pub struct MockChmApi {
    requests: AtomicUsize,
    error: Mutex<Option<String>>,
    gate: Mutex<Option<Gate>>,
}

impl MockChmApi {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Makes every later prediction fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.error.lock().unwrap() = Some(message.to_string());
    }

    pub fn gate(&self, gate: Gate) {
        *self.gate.lock().unwrap() = Some(gate);
    }
}

#[async_trait::async_trait]
impl ChmApi for MockChmApi {
    async fn predict(&self, _aoi: &AreaOfInterest, year: i32) -> Result<ChmResult, ClientError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        let error = self.error.lock().unwrap().clone();
        error.map_or_else(|| Ok(fixtures::chm(year)), |message| Err(ClientError::Chm { message }))
    }
}
