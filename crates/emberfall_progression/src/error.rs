//! Comprehensive error types for the progression system

use std::{io::Error as IoError, path::PathBuf};
use thiserror::Error;

use crate::types::PlayerId;

/// Definition builder errors
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Identifier cannot be empty")]
    EmptyId,

    #[error("Identifier '{0}' is not lowercase snake_case")]
    InvalidId(String),

    #[error("Display name cannot be empty for '{0}'")]
    EmptyName(String),

    #[error("Achievement '{0}' cannot be its own parent")]
    SelfParent(String),

    #[error("Achievement '{0}' has a target value but no source statistic")]
    TargetWithoutStatistic(String),

    #[error("Achievement '{0}' has a source statistic but no target value")]
    StatisticWithoutTarget(String),

    #[error("Achievement '{0}' has a non-positive target value {1}")]
    NonPositiveTarget(String, i64),
}

/// Catalog registration errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Achievement '{0}' is already registered")]
    DuplicateAchievement(String),

    #[error("Statistic '{0}' is already registered")]
    DuplicateStatistic(String),

    #[error("Statistic group '{0}' is already registered")]
    DuplicateGroup(String),

    #[error("Achievement '{0}' references unknown parent achievement '{1}'")]
    UnknownParent(String, String),

    #[error("Statistic '{0}' references unknown group '{1}'")]
    UnknownGroup(String, String),

    #[error("Achievement '{0}' references unknown source statistic '{1}'")]
    UnknownSourceStatistic(String, String),

    #[error("Invalid definition: {0}")]
    Definition(#[from] DefinitionError),

    #[error("Failed to parse catalog document: {0}")]
    CatalogParse(#[from] toml::de::Error),
}

/// Player data manipulation errors
#[derive(Debug, Error)]
pub enum ProgressionError {
    #[error("Unknown achievement '{0}'")]
    UnknownAchievement(String),

    #[error("Unknown statistic '{0}'")]
    UnknownStatistic(String),

    #[error("Unknown statistic group '{0}'")]
    UnknownStatisticGroup(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Progression storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read directory {0}: {1}")]
    DirectoryRead(PathBuf, IoError),

    #[error("Failed to create directory {0}: {1}")]
    DirectoryCreate(PathBuf, IoError),

    #[error("Failed to read file {0}: {1}")]
    FileRead(PathBuf, IoError),

    #[error("Failed to create file {0}: {1}")]
    FileCreate(PathBuf, IoError),

    #[error("Failed to write to file {0}: {1}")]
    FileWrite(PathBuf, IoError),

    #[error("Failed to sync file {0}: {1}")]
    FileSync(PathBuf, IoError),

    #[error("Failed to rename file from {0} to {1}: {2}")]
    FileRename(PathBuf, PathBuf, IoError),

    #[error("Failed to delete file {0}: {1}")]
    FileDelete(PathBuf, IoError),

    #[error("Failed to get metadata for file {0}: {1}")]
    FileMetadata(PathBuf, Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to serialize progression for player {0}: {1}")]
    Serialization(PlayerId, serde_json::Error),

    #[error("Failed to deserialize file {0}: {1}")]
    Deserialization(PathBuf, serde_json::Error),

    #[error("No progression stored for player {0}")]
    PlayerNotFound(PlayerId),
}

/// Event serialization errors
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(serde_json::Error),
}

// Result type aliases for convenience
pub type DefinitionResult<T> = Result<T, DefinitionError>;
pub type RegistryResult<T> = Result<T, RegistryError>;
pub type ProgressionResult<T> = Result<T, ProgressionError>;
pub type StorageResult<T> = Result<T, StorageError>;
