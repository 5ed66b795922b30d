//! Catalogue of lifecycle operations a plugin may implement.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A lifecycle operation the engine can ask a plugin to perform.
///
/// Variants are declared in catalogue order, which is also their ordering.
///
/// # Example
///
/// ```
/// use dvp_platform::Operation;
///
/// assert_eq!(Operation::VirtualConfigure.as_str(), "virtual.configure()");
/// assert_eq!(Operation::parse("linked.status()"), Some(Operation::LinkedStatus));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Operation {
    /// Discovers repositories on a host environment.
    DiscoveryRepository,
    /// Discovers source configs within a repository.
    DiscoverySourceConfig,
    /// Runs before a linked source is snapshotted.
    LinkedPreSnapshot,
    /// Runs after a linked source is snapshotted.
    LinkedPostSnapshot,
    /// Starts staging for a linked source.
    LinkedStartStaging,
    /// Stops staging for a linked source.
    LinkedStopStaging,
    /// Reports the status of a staged linked source.
    LinkedStatus,
    /// Periodic worker for a staged linked source.
    LinkedWorker,
    /// Describes the mounts a linked source needs.
    LinkedMountSpecification,
    /// Configures a newly provisioned virtual source.
    VirtualConfigure,
    /// Tears down a virtual source's configuration.
    VirtualUnconfigure,
    /// Reconfigures a virtual source after a refresh or enable.
    VirtualReconfigure,
    /// Starts a virtual source.
    VirtualStart,
    /// Stops a virtual source.
    VirtualStop,
    /// Runs before a virtual source is snapshotted.
    VirtualPreSnapshot,
    /// Runs after a virtual source is snapshotted.
    VirtualPostSnapshot,
    /// Reports the status of a virtual source.
    VirtualStatus,
    /// Initializes an empty virtual source.
    VirtualInitialize,
    /// Describes the mounts a virtual source needs.
    VirtualMountSpecification,
}

impl Operation {
    /// Every operation, in catalogue order.
    pub const ALL: [Self; 19] = [
        Self::DiscoveryRepository,
        Self::DiscoverySourceConfig,
        Self::LinkedPreSnapshot,
        Self::LinkedPostSnapshot,
        Self::LinkedStartStaging,
        Self::LinkedStopStaging,
        Self::LinkedStatus,
        Self::LinkedWorker,
        Self::LinkedMountSpecification,
        Self::VirtualConfigure,
        Self::VirtualUnconfigure,
        Self::VirtualReconfigure,
        Self::VirtualStart,
        Self::VirtualStop,
        Self::VirtualPreSnapshot,
        Self::VirtualPostSnapshot,
        Self::VirtualStatus,
        Self::VirtualInitialize,
        Self::VirtualMountSpecification,
    ];

    /// Returns the stable dotted name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DiscoveryRepository => "discovery.repository()",
            Self::DiscoverySourceConfig => "discovery.source_config()",
            Self::LinkedPreSnapshot => "linked.pre_snapshot()",
            Self::LinkedPostSnapshot => "linked.post_snapshot()",
            Self::LinkedStartStaging => "linked.start_staging()",
            Self::LinkedStopStaging => "linked.stop_staging()",
            Self::LinkedStatus => "linked.status()",
            Self::LinkedWorker => "linked.worker()",
            Self::LinkedMountSpecification => "linked.mount_specification()",
            Self::VirtualConfigure => "virtual.configure()",
            Self::VirtualUnconfigure => "virtual.unconfigure()",
            Self::VirtualReconfigure => "virtual.reconfigure()",
            Self::VirtualStart => "virtual.start()",
            Self::VirtualStop => "virtual.stop()",
            Self::VirtualPreSnapshot => "virtual.pre_snapshot()",
            Self::VirtualPostSnapshot => "virtual.post_snapshot()",
            Self::VirtualStatus => "virtual.status()",
            Self::VirtualInitialize => "virtual.initialize()",
            Self::VirtualMountSpecification => "virtual.mount_specification()",
        }
    }

    /// Looks up an operation by its dotted name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// Returns the definition an operation belongs to in an upload artifact.
    #[must_use]
    pub const fn definition(self) -> Definition {
        match self {
            Self::DiscoveryRepository | Self::DiscoverySourceConfig => Definition::Discovery,
            Self::LinkedPreSnapshot
            | Self::LinkedPostSnapshot
            | Self::LinkedStartStaging
            | Self::LinkedStopStaging
            | Self::LinkedStatus
            | Self::LinkedWorker
            | Self::LinkedMountSpecification => Definition::LinkedSource,
            Self::VirtualConfigure
            | Self::VirtualUnconfigure
            | Self::VirtualReconfigure
            | Self::VirtualStart
            | Self::VirtualStop
            | Self::VirtualPreSnapshot
            | Self::VirtualPostSnapshot
            | Self::VirtualStatus
            | Self::VirtualInitialize
            | Self::VirtualMountSpecification => Definition::VirtualSource,
        }
    }

    /// Returns the key holding the operation inside its definition.
    #[must_use]
    pub const fn slot(self) -> &'static str {
        match self {
            Self::DiscoveryRepository => "repositoryDiscovery",
            Self::DiscoverySourceConfig => "sourceConfigDiscovery",
            Self::LinkedPreSnapshot | Self::VirtualPreSnapshot => "preSnapshot",
            Self::LinkedPostSnapshot | Self::VirtualPostSnapshot => "postSnapshot",
            Self::LinkedStartStaging => "startStaging",
            Self::LinkedStopStaging => "stopStaging",
            Self::LinkedStatus | Self::VirtualStatus => "status",
            Self::LinkedWorker => "worker",
            Self::LinkedMountSpecification | Self::VirtualMountSpecification => {
                "mountSpecification"
            }
            Self::VirtualConfigure => "configure",
            Self::VirtualUnconfigure => "unconfigure",
            Self::VirtualReconfigure => "reconfigure",
            Self::VirtualStart => "start",
            Self::VirtualStop => "stop",
            Self::VirtualInitialize => "initialize",
        }
    }

    /// Returns `true` for linked operations that only staged plugins offer.
    #[must_use]
    pub const fn is_staged_only(self) -> bool {
        matches!(
            self,
            Self::LinkedStartStaging
                | Self::LinkedStopStaging
                | Self::LinkedStatus
                | Self::LinkedWorker
                | Self::LinkedMountSpecification
        )
    }
}

/// Top-level definitions of an upload artifact that hold operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Definition {
    /// `discoveryDefinition`.
    Discovery,
    /// `linkedSourceDefinition`.
    LinkedSource,
    /// `virtualSourceDefinition`.
    VirtualSource,
}

impl Definition {
    /// Returns the artifact key of the definition.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Discovery => "discoveryDefinition",
            Self::LinkedSource => "linkedSourceDefinition",
            Self::VirtualSource => "virtualSourceDefinition",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Operation> for &'static str {
    fn from(operation: Operation) -> Self {
        operation.as_str()
    }
}

impl TryFrom<String> for Operation {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(&name).ok_or_else(|| format!("unknown operation '{name}'"))
    }
}
