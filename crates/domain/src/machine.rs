//! Machine — the hardware+software execution context a test ran on.

use serde::{Deserialize, Serialize};

use crate::error::{TestmonError, ValidationError};
use crate::fingerprint::Fingerprint;
use crate::id::Identity;

/// An execution context, reported once per distinct node.
///
/// When no uid is supplied at construction, the identity is derived from
/// a fingerprint over every other field, so identical hardware/software
/// combinations always resolve to the same uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub uid: Identity,
    pub cpu_frequency: u32,
    pub cpu_vendor: String,
    pub cpu_count: u32,
    pub cpu_type: String,
    pub total_ram: u64,
    pub hostname: String,
    pub machine_type: String,
    pub machine_arch: String,
    pub system_info: String,
    pub python_info: String,
}

impl Machine {
    /// Create a builder for constructing a [`Machine`].
    #[must_use]
    pub fn builder() -> MachineBuilder {
        MachineBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TestmonError::Validation`] when a numeric capacity field
    /// is zero or the hostname is empty.
    pub fn validate(&self) -> Result<(), TestmonError> {
        if self.cpu_frequency == 0 {
            return Err(ValidationError::ZeroCpuFrequency.into());
        }
        if self.cpu_count == 0 {
            return Err(ValidationError::ZeroCpuCount.into());
        }
        if self.total_ram == 0 {
            return Err(ValidationError::ZeroTotalRam.into());
        }
        if self.hostname.is_empty() {
            return Err(ValidationError::EmptyHostname.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Machine`].
#[derive(Debug, Default)]
pub struct MachineBuilder {
    uid: Option<String>,
    cpu_frequency: u32,
    cpu_vendor: String,
    cpu_count: u32,
    cpu_type: String,
    total_ram: u64,
    hostname: String,
    machine_type: String,
    machine_arch: String,
    system_info: String,
    python_info: String,
}

impl MachineBuilder {
    #[must_use]
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    #[must_use]
    pub fn cpu_frequency(mut self, cpu_frequency: u32) -> Self {
        self.cpu_frequency = cpu_frequency;
        self
    }

    #[must_use]
    pub fn cpu_vendor(mut self, cpu_vendor: impl Into<String>) -> Self {
        self.cpu_vendor = cpu_vendor.into();
        self
    }

    #[must_use]
    pub fn cpu_count(mut self, cpu_count: u32) -> Self {
        self.cpu_count = cpu_count;
        self
    }

    #[must_use]
    pub fn cpu_type(mut self, cpu_type: impl Into<String>) -> Self {
        self.cpu_type = cpu_type.into();
        self
    }

    #[must_use]
    pub fn total_ram(mut self, total_ram: u64) -> Self {
        self.total_ram = total_ram;
        self
    }

    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    #[must_use]
    pub fn machine_type(mut self, machine_type: impl Into<String>) -> Self {
        self.machine_type = machine_type.into();
        self
    }

    #[must_use]
    pub fn machine_arch(mut self, machine_arch: impl Into<String>) -> Self {
        self.machine_arch = machine_arch.into();
        self
    }

    #[must_use]
    pub fn system_info(mut self, system_info: impl Into<String>) -> Self {
        self.system_info = system_info.into();
        self
    }

    #[must_use]
    pub fn python_info(mut self, python_info: impl Into<String>) -> Self {
        self.python_info = python_info.into();
        self
    }

    fn footprint(&self) -> String {
        Fingerprint::new()
            .field(self.cpu_count.to_string())
            .field(self.cpu_frequency.to_string())
            .field(&self.cpu_type)
            .field(&self.cpu_vendor)
            .field(self.total_ram.to_string())
            .field(&self.hostname)
            .field(&self.machine_type)
            .field(&self.machine_arch)
            .field(&self.system_info)
            .field(&self.python_info)
            .finish()
    }

    /// Consume the builder, resolve the identity, validate, and return a
    /// [`Machine`].
    ///
    /// # Errors
    ///
    /// Returns [`TestmonError::Validation`] if invariants fail.
    pub fn build(self) -> Result<Machine, TestmonError> {
        let uid = match self.uid {
            Some(uid) => Identity::Supplied(uid),
            None => Identity::Derived(self.footprint()),
        };
        let machine = Machine {
            uid,
            cpu_frequency: self.cpu_frequency,
            cpu_vendor: self.cpu_vendor,
            cpu_count: self.cpu_count,
            cpu_type: self.cpu_type,
            total_ram: self.total_ram,
            hostname: self.hostname,
            machine_type: self.machine_type,
            machine_arch: self.machine_arch,
            system_info: self.system_info,
            python_info: self.python_info,
        };
        machine.validate()?;
        Ok(machine)
    }
}
