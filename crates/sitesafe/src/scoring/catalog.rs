use serde::{Deserialize, Serialize};

/// Every monthly safety parameter a site reports against.
///
/// The set mirrors the submission template sites already use; serde names
/// match the template's camelCase field keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ParameterKey {
    ManDays,
    SafeWorkHours,
    SafetyInduction,
    ToolBoxTalk,
    JobSpecificTraining,
    FormalSafetyInspection,
    NonComplianceRaised,
    NonComplianceClose,
    SafetyObservationRaised,
    SafetyObservationClose,
    WorkPermitIssued,
    SafeWorkMethodStatement,
    EmergencyMockDrills,
    InternalAudit,
    NearMissReport,
    FirstAidInjury,
    MedicalTreatmentInjury,
    LostTimeInjury,
    RecordableIncidents,
    PpeComplianceRate,
    PpeObservations,
    WorkforceTrained,
    UpcomingTrainings,
    OverdueTrainings,
    WasteGenerated,
    WasteDisposed,
    EnergyConsumption,
    WaterConsumption,
    SpillsIncidents,
    EnvironmentalIncidents,
    HealthCheckupCompliance,
    WaterQualityTest,
}

impl ParameterKey {
    pub const ALL: [ParameterKey; 32] = [
        ParameterKey::ManDays,
        ParameterKey::SafeWorkHours,
        ParameterKey::SafetyInduction,
        ParameterKey::ToolBoxTalk,
        ParameterKey::JobSpecificTraining,
        ParameterKey::FormalSafetyInspection,
        ParameterKey::NonComplianceRaised,
        ParameterKey::NonComplianceClose,
        ParameterKey::SafetyObservationRaised,
        ParameterKey::SafetyObservationClose,
        ParameterKey::WorkPermitIssued,
        ParameterKey::SafeWorkMethodStatement,
        ParameterKey::EmergencyMockDrills,
        ParameterKey::InternalAudit,
        ParameterKey::NearMissReport,
        ParameterKey::FirstAidInjury,
        ParameterKey::MedicalTreatmentInjury,
        ParameterKey::LostTimeInjury,
        ParameterKey::RecordableIncidents,
        ParameterKey::PpeComplianceRate,
        ParameterKey::PpeObservations,
        ParameterKey::WorkforceTrained,
        ParameterKey::UpcomingTrainings,
        ParameterKey::OverdueTrainings,
        ParameterKey::WasteGenerated,
        ParameterKey::WasteDisposed,
        ParameterKey::EnergyConsumption,
        ParameterKey::WaterConsumption,
        ParameterKey::SpillsIncidents,
        ParameterKey::EnvironmentalIncidents,
        ParameterKey::HealthCheckupCompliance,
        ParameterKey::WaterQualityTest,
    ];

    /// Base label used for import/export column headers, e.g. `ManDaysTarget`
    /// and `ManDaysActual`.
    pub fn column_label(&self) -> &'static str {
        match self {
            ParameterKey::ManDays => "ManDays",
            ParameterKey::SafeWorkHours => "SafeWorkHours",
            ParameterKey::SafetyInduction => "SafetyInduction",
            ParameterKey::ToolBoxTalk => "ToolBoxTalk",
            ParameterKey::JobSpecificTraining => "JobSpecificTraining",
            ParameterKey::FormalSafetyInspection => "FormalSafetyInspection",
            ParameterKey::NonComplianceRaised => "NonComplianceRaised",
            ParameterKey::NonComplianceClose => "NonComplianceClose",
            ParameterKey::SafetyObservationRaised => "SafetyObservationRaised",
            ParameterKey::SafetyObservationClose => "SafetyObservationClose",
            ParameterKey::WorkPermitIssued => "WorkPermitIssued",
            ParameterKey::SafeWorkMethodStatement => "SafeWorkMethodStatement",
            ParameterKey::EmergencyMockDrills => "EmergencyMockDrills",
            ParameterKey::InternalAudit => "InternalAudit",
            ParameterKey::NearMissReport => "NearMissReport",
            ParameterKey::FirstAidInjury => "FirstAidInjury",
            ParameterKey::MedicalTreatmentInjury => "MedicalTreatmentInjury",
            ParameterKey::LostTimeInjury => "LostTimeInjury",
            ParameterKey::RecordableIncidents => "RecordableIncidents",
            ParameterKey::PpeComplianceRate => "PPEComplianceRate",
            ParameterKey::PpeObservations => "PPEObservations",
            ParameterKey::WorkforceTrained => "WorkforceTrained",
            ParameterKey::UpcomingTrainings => "UpcomingTrainings",
            ParameterKey::OverdueTrainings => "OverdueTrainings",
            ParameterKey::WasteGenerated => "WasteGenerated",
            ParameterKey::WasteDisposed => "WasteDisposed",
            ParameterKey::EnergyConsumption => "EnergyConsumption",
            ParameterKey::WaterConsumption => "WaterConsumption",
            ParameterKey::SpillsIncidents => "SpillsIncidents",
            ParameterKey::EnvironmentalIncidents => "EnvironmentalIncidents",
            ParameterKey::HealthCheckupCompliance => "HealthCheckupCompliance",
            ParameterKey::WaterQualityTest => "WaterQualityTest",
        }
    }
}

/// How a parameter's target/actual pair converts to earned points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoringPolicy {
    /// Higher actual is better; proportional credit capped at full weight.
    Ratio,
    /// Lower actual is better; full credit at or below target, proportional
    /// penalty above it.
    InvertedRatio,
    /// All-or-nothing credit for metrics whose target is conventionally zero
    /// (incidents, spills, non-compliances).
    Binary,
}

/// Immutable catalog entry tying a parameter to its weight and policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterDefinition {
    pub key: ParameterKey,
    pub weight: f64,
    pub policy: ScoringPolicy,
}

/// Catalog construction failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("parameter {0:?} appears more than once")]
    DuplicateKey(ParameterKey),
    #[error("parameter {key:?} has invalid weight {weight}")]
    InvalidWeight { key: ParameterKey, weight: f64 },
    #[error("catalog weights must sum to 100, found {0}")]
    WeightSum(f64),
}

/// Ordered, immutable set of parameter definitions whose weights sum to 100.
///
/// Built once at startup and passed explicitly to the scoring engine so tests
/// (and eventually per-tenant overrides) can swap weight tables without any
/// global state.
#[derive(Debug, Clone)]
pub struct ParameterCatalog {
    entries: Vec<ParameterDefinition>,
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

impl ParameterCatalog {
    pub fn new(entries: Vec<ParameterDefinition>) -> Result<Self, CatalogError> {
        let mut seen = Vec::with_capacity(entries.len());
        let mut sum = 0.0;

        for entry in &entries {
            if seen.contains(&entry.key) {
                return Err(CatalogError::DuplicateKey(entry.key));
            }
            seen.push(entry.key);

            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                return Err(CatalogError::InvalidWeight {
                    key: entry.key,
                    weight: entry.weight,
                });
            }
            sum += entry.weight;
        }

        if (sum - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CatalogError::WeightSum(sum));
        }

        Ok(Self { entries })
    }

    /// The production weight table. Incident parameters carry the heaviest
    /// weights so a single recordable event has a real impact on the monthly
    /// score.
    pub fn standard() -> Self {
        use ParameterKey::*;
        use ScoringPolicy::*;

        let entries = vec![
            def(ManDays, 2.0, Ratio),
            def(SafeWorkHours, 2.0, Ratio),
            def(SafetyInduction, 3.0, Ratio),
            def(ToolBoxTalk, 3.0, Ratio),
            def(JobSpecificTraining, 3.0, Ratio),
            def(FormalSafetyInspection, 4.0, Ratio),
            def(NonComplianceRaised, 2.0, InvertedRatio),
            def(NonComplianceClose, 3.0, Ratio),
            def(SafetyObservationRaised, 3.0, Ratio),
            def(SafetyObservationClose, 3.0, Ratio),
            def(WorkPermitIssued, 2.0, Ratio),
            def(SafeWorkMethodStatement, 2.0, Ratio),
            def(EmergencyMockDrills, 3.0, Ratio),
            def(InternalAudit, 3.0, Ratio),
            def(NearMissReport, 4.0, Ratio),
            def(FirstAidInjury, 8.0, Binary),
            def(MedicalTreatmentInjury, 8.0, Binary),
            def(LostTimeInjury, 8.0, Binary),
            def(RecordableIncidents, 8.0, Binary),
            def(PpeComplianceRate, 3.0, Ratio),
            def(PpeObservations, 2.0, Ratio),
            def(WorkforceTrained, 3.0, Ratio),
            def(UpcomingTrainings, 1.0, Ratio),
            def(OverdueTrainings, 2.0, InvertedRatio),
            def(WasteGenerated, 2.0, InvertedRatio),
            def(WasteDisposed, 1.0, Ratio),
            def(EnergyConsumption, 1.5, InvertedRatio),
            def(WaterConsumption, 1.5, InvertedRatio),
            def(SpillsIncidents, 3.0, Binary),
            def(EnvironmentalIncidents, 3.0, Binary),
            def(HealthCheckupCompliance, 2.0, Ratio),
            def(WaterQualityTest, 1.0, Ratio),
        ];

        Self::new(entries).expect("standard catalog weights sum to 100")
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.entries.iter()
    }

    pub fn get(&self, key: ParameterKey) -> Option<&ParameterDefinition> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }
}

fn def(key: ParameterKey, weight: f64, policy: ScoringPolicy) -> ParameterDefinition {
    ParameterDefinition {
        key,
        weight,
        policy,
    }
}
