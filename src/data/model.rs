use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::DashboardError;

// ---------------------------------------------------------------------------
// Column – the static schema
// ---------------------------------------------------------------------------

/// Whether a column holds labels or measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Categorical,
    Numeric,
}

/// One of the twelve canonical dataset columns.
///
/// The schema is closed: every column, its kind and its source header are
/// declared here, nothing is inferred from file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Column {
    Make,
    Model,
    VehicleClass,
    EngineSize,
    Cylinders,
    Transmission,
    FuelType,
    FuelCity,
    FuelHighway,
    FuelCombined,
    FuelCombinedMpg,
    Co2Emissions,
}

impl Column {
    /// All columns in source-file order.
    pub const ALL: [Column; 12] = [
        Column::Make,
        Column::Model,
        Column::VehicleClass,
        Column::EngineSize,
        Column::Cylinders,
        Column::Transmission,
        Column::FuelType,
        Column::FuelCity,
        Column::FuelHighway,
        Column::FuelCombined,
        Column::FuelCombinedMpg,
        Column::Co2Emissions,
    ];

    /// Canonical (internal) column name.
    pub fn name(self) -> &'static str {
        match self {
            Column::Make => "marca",
            Column::Model => "modelo",
            Column::VehicleClass => "classe_veiculo",
            Column::EngineSize => "tamanho_motor_l",
            Column::Cylinders => "cilindros",
            Column::Transmission => "transmissao",
            Column::FuelType => "tipo_combustivel",
            Column::FuelCity => "consumo_cidade_l_100km",
            Column::FuelHighway => "consumo_estrada_l_100km",
            Column::FuelCombined => "consumo_combinado_l_100km",
            Column::FuelCombinedMpg => "consumo_combinado_mpg",
            Column::Co2Emissions => "emissoes_co2_g_km",
        }
    }

    /// Header used for this column in the source CSV.
    pub fn source_name(self) -> &'static str {
        match self {
            Column::Make => "Make",
            Column::Model => "Model",
            Column::VehicleClass => "Vehicle Class",
            Column::EngineSize => "Engine Size(L)",
            Column::Cylinders => "Cylinders",
            Column::Transmission => "Transmission",
            Column::FuelType => "Fuel Type",
            Column::FuelCity => "Fuel Consumption City (L/100 km)",
            Column::FuelHighway => "Fuel Consumption Hwy (L/100 km)",
            Column::FuelCombined => "Fuel Consumption Comb (L/100 km)",
            Column::FuelCombinedMpg => "Fuel Consumption Comb (mpg)",
            Column::Co2Emissions => "CO2 Emissions(g/km)",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Make
            | Column::Model
            | Column::VehicleClass
            | Column::Transmission
            | Column::FuelType => ColumnKind::Categorical,
            _ => ColumnKind::Numeric,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    /// Data-dictionary description shown next to the canonical name.
    pub fn description(self) -> &'static str {
        match self {
            Column::Make => "Fabricante do veículo",
            Column::Model => "Modelo específico do veículo",
            Column::VehicleClass => "Categoria do veículo (ex: SUV, COMPACT)",
            Column::EngineSize => "Tamanho do motor em litros (L)",
            Column::Cylinders => "Número de cilindros do motor",
            Column::Transmission => "Tipo de transmissão e número de marchas",
            Column::FuelType => "Tipo de combustível (X, Z, D, E, N)",
            Column::FuelCity => "Consumo de combustível na cidade (L/100 km)",
            Column::FuelHighway => "Consumo de combustível na estrada (L/100 km)",
            Column::FuelCombined => "Consumo de combustível combinado (55% cidade, 45% estrada)",
            Column::FuelCombinedMpg => "Consumo combinado em Milhas por Galão (MPG)",
            Column::Co2Emissions => "Emissões de CO2 em gramas por quilômetro (g/km)",
        }
    }

    /// Numeric columns in source order.
    pub fn numeric() -> impl Iterator<Item = Column> {
        Column::ALL.into_iter().filter(|c| c.is_numeric())
    }

    /// Categorical columns in source order.
    pub fn categorical() -> impl Iterator<Item = Column> {
        Column::ALL.into_iter().filter(|c| !c.is_numeric())
    }

    /// Resolve a canonical column name.
    pub fn from_name(name: &str) -> Result<Column, DashboardError> {
        Column::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| DashboardError::UnknownColumn(name.to_string()))
    }

    /// Resolve a source header (surrounding whitespace ignored).
    pub fn from_source_name(header: &str) -> Option<Column> {
        let header = header.trim();
        Column::ALL.into_iter().find(|c| c.source_name() == header)
    }
}

impl TryFrom<String> for Column {
    type Error = DashboardError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Column::from_name(&name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// FilterColumn – the columns a user can filter on
// ---------------------------------------------------------------------------

/// Categorical columns exposed as multi-select filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterColumn {
    Make,
    VehicleClass,
    FuelType,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 3] = [
        FilterColumn::Make,
        FilterColumn::VehicleClass,
        FilterColumn::FuelType,
    ];

    pub fn column(self) -> Column {
        match self {
            FilterColumn::Make => Column::Make,
            FilterColumn::VehicleClass => Column::VehicleClass,
            FilterColumn::FuelType => Column::FuelType,
        }
    }

    /// Label shown above the filter widget.
    pub fn label(self) -> &'static str {
        match self {
            FilterColumn::Make => "Marca",
            FilterColumn::VehicleClass => "Classe do veículo",
            FilterColumn::FuelType => "Tipo de combustível",
        }
    }
}

// ---------------------------------------------------------------------------
// Value – a borrowed view of one cell
// ---------------------------------------------------------------------------

/// A single cell, typed by its column's kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Text(&'a str),
    Number(f64),
}

impl Value<'_> {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(v) if v.fract() == 0.0 => write!(f, "{v:.0}"),
            Value::Number(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// One vehicle, with fields named by their canonical column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub marca: String,
    pub modelo: String,
    pub classe_veiculo: String,
    pub tamanho_motor_l: f64,
    pub cilindros: u32,
    pub transmissao: String,
    pub tipo_combustivel: String,
    pub consumo_cidade_l_100km: f64,
    pub consumo_estrada_l_100km: f64,
    pub consumo_combinado_l_100km: f64,
    pub consumo_combinado_mpg: f64,
    pub emissoes_co2_g_km: f64,
}

impl Record {
    pub fn value(&self, column: Column) -> Value<'_> {
        match column {
            Column::Make => Value::Text(&self.marca),
            Column::Model => Value::Text(&self.modelo),
            Column::VehicleClass => Value::Text(&self.classe_veiculo),
            Column::EngineSize => Value::Number(self.tamanho_motor_l),
            Column::Cylinders => Value::Number(f64::from(self.cilindros)),
            Column::Transmission => Value::Text(&self.transmissao),
            Column::FuelType => Value::Text(&self.tipo_combustivel),
            Column::FuelCity => Value::Number(self.consumo_cidade_l_100km),
            Column::FuelHighway => Value::Number(self.consumo_estrada_l_100km),
            Column::FuelCombined => Value::Number(self.consumo_combinado_l_100km),
            Column::FuelCombinedMpg => Value::Number(self.consumo_combinado_mpg),
            Column::Co2Emissions => Value::Number(self.emissoes_co2_g_km),
        }
    }

    /// Label of a filterable column.
    pub fn category(&self, column: FilterColumn) -> &str {
        match column {
            FilterColumn::Make => &self.marca,
            FilterColumn::VehicleClass => &self.classe_veiculo,
            FilterColumn::FuelType => &self.tipo_combustivel,
        }
    }

    /// Numeric value of `column`, `None` for categorical columns.
    pub fn number(&self, column: Column) -> Option<f64> {
        self.value(column).as_f64()
    }

    /// First measure holding `NaN` or an infinity, if any.
    pub fn non_finite_measure(&self) -> Option<Column> {
        Column::numeric().find(|&col| self.number(col).is_some_and(|v| !v.is_finite()))
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded table. Immutable once built; filtering produces views.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    source: PathBuf,
    /// Source headers outside the schema, skipped at load time.
    ignored_columns: Vec<String>,
    /// Sorted distinct labels of each filterable column.
    unique_values: BTreeMap<FilterColumn, BTreeSet<String>>,
}

impl Dataset {
    /// Build the table and its filter-column indices.
    pub fn new(
        source: impl Into<PathBuf>,
        records: Vec<Record>,
        ignored_columns: Vec<String>,
    ) -> Self {
        let mut unique_values: BTreeMap<FilterColumn, BTreeSet<String>> = FilterColumn::ALL
            .into_iter()
            .map(|col| (col, BTreeSet::new()))
            .collect();

        for record in &records {
            for (col, values) in unique_values.iter_mut() {
                let label = record.category(*col);
                if !values.contains(label) {
                    values.insert(label.to_string());
                }
            }
        }

        Dataset {
            records,
            source: source.into(),
            ignored_columns,
            unique_values,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn ignored_columns(&self) -> &[String] {
        &self.ignored_columns
    }

    /// Sorted distinct labels of a filterable column.
    pub fn unique_values(&self, column: FilterColumn) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.unique_values.get(&column).unwrap_or(&EMPTY)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
impl Record {
    /// Minimal record for pipeline tests; unspecified measures are zero.
    pub(crate) fn sample(make: &str, class: &str, fuel: &str, co2: f64) -> Self {
        Record {
            marca: make.to_string(),
            modelo: format!("{make} model"),
            classe_veiculo: class.to_string(),
            tamanho_motor_l: 2.0,
            cilindros: 4,
            transmissao: "A6".to_string(),
            tipo_combustivel: fuel.to_string(),
            consumo_cidade_l_100km: 0.0,
            consumo_estrada_l_100km: 0.0,
            consumo_combinado_l_100km: 0.0,
            consumo_combinado_mpg: 0.0,
            emissoes_co2_g_km: co2,
        }
    }
}
