use entsql::{
    AdapterSettings, ColumnDescriptor, DataSourceSettings, DbType, DialectKind,
    ParameterDirection, RoutingOptions, TableInfo,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw, &config_path)?;

        Ok(Self { config_path, file })
    }

    pub fn entity(&self, name: &str) -> anyhow::Result<&EntityConfig> {
        self.file
            .entities
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| anyhow::anyhow!("no entity named {name} in config"))
    }
}

impl ConfigFile {
    /// Options for compiling `entity`, with an optional dialect override.
    pub fn routing_options(
        &self,
        entity: &EntityConfig,
        dialect: Option<DialectKind>,
    ) -> RoutingOptions {
        let options =
            RoutingOptions::from_settings(&self.data_source, &entity.adapter(&self.adapter));
        match dialect {
            Some(d) => options.with_dialect(d),
            None => options,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub data_source: DataSourceSettings,

    #[serde(default)]
    pub adapter: AdapterSettings,

    #[serde(default)]
    pub entities: Vec<EntityConfig>,
}

impl ConfigFile {
    pub fn parse(raw: &str, origin: &Path) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(raw).map_err(|e| {
            anyhow::anyhow!("failed to parse config file {}: {e}", origin.display())
        })?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.entities.is_empty() {
            anyhow::bail!("at least one [[entities]] entry is required");
        }

        let mut seen = HashSet::<&str>::new();
        for e in &self.entities {
            if e.name.trim().is_empty() {
                anyhow::bail!("entities.name must not be empty");
            }
            if !seen.insert(e.name.as_str()) {
                anyhow::bail!("duplicate entity name: {}", e.name);
            }
            if e.table.trim().is_empty() {
                anyhow::bail!("entities.table must not be empty (entity: {})", e.name);
            }
            if e.columns.is_empty() {
                anyhow::bail!("entity {} has no [[entities.columns]]", e.name);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    pub table: String,
    pub alias: Option<String>,
    /// Declared type of the entity; defaults to `name`.
    pub source_type: Option<String>,

    /// Per-entity overrides of `[adapter]`.
    pub bulk_load: Option<bool>,
    pub read_limit: Option<u32>,

    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

impl EntityConfig {
    pub fn source_type(&self) -> &str {
        self.source_type.as_deref().unwrap_or(&self.name)
    }

    pub fn table_info(&self) -> TableInfo {
        let table = TableInfo::new(&self.table).with_source_type(self.source_type());
        match &self.alias {
            Some(alias) => table.with_alias(alias),
            None => table,
        }
    }

    pub fn descriptors(&self) -> Vec<ColumnDescriptor> {
        self.columns.iter().map(ColumnConfig::descriptor).collect()
    }

    pub fn has_foreign_key(&self) -> bool {
        self.columns.iter().any(|c| c.foreign_key)
    }

    pub fn adapter(&self, defaults: &AdapterSettings) -> AdapterSettings {
        AdapterSettings {
            bulk_load: self.bulk_load.unwrap_or(defaults.bulk_load),
            read_limit: self.read_limit.or(defaults.read_limit),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    #[serde(rename = "type", default)]
    pub db_type: DbType,
    pub alias: Option<String>,
    pub parameter: Option<String>,
    #[serde(default)]
    pub direction: ParameterDirection,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub foreign_key: bool,
    #[serde(default)]
    pub db_generated: bool,
}

impl ColumnConfig {
    pub fn descriptor(&self) -> ColumnDescriptor {
        let mut d = ColumnDescriptor::new(&self.name, self.db_type).with_direction(self.direction);
        if let Some(parameter) = &self.parameter {
            d = d.with_parameter(parameter);
        }
        if let Some(alias) = &self.alias {
            d = d.with_alias(alias);
        }
        if self.nullable {
            d = d.nullable();
        }
        if self.primary_key {
            d = d.primary_key();
        }
        if self.foreign_key {
            d = d.foreign_key();
        }
        if self.db_generated {
            d = d.db_generated();
        }
        d
    }
}
