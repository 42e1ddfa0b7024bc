//! Storage record for execution contexts.

use testmon_domain::error::EntityKind;
use testmon_domain::id::Identity;
use testmon_domain::machine::Machine;

use crate::record::{MapError, Record};

/// Row shape of the `execution_contexts` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineRecord {
    pub uid: String,
    pub cpu_frequency: i64,
    pub cpu_vendor: String,
    pub cpu_count: i64,
    pub cpu_type: String,
    pub total_ram: i64,
    pub hostname: String,
    pub machine_type: String,
    pub machine_arch: String,
    pub system_info: String,
    pub python_info: String,
}

impl Record for MachineRecord {
    type Domain = Machine;

    const KIND: EntityKind = EntityKind::Machine;

    fn uid(&self) -> &str {
        &self.uid
    }

    fn from_domain(domain: &Machine) -> Result<Self, MapError> {
        Ok(Self {
            uid: domain.uid.as_str().to_string(),
            cpu_frequency: i64::from(domain.cpu_frequency),
            cpu_vendor: domain.cpu_vendor.clone(),
            cpu_count: i64::from(domain.cpu_count),
            cpu_type: domain.cpu_type.clone(),
            total_ram: i64::try_from(domain.total_ram)?,
            hostname: domain.hostname.clone(),
            machine_type: domain.machine_type.clone(),
            machine_arch: domain.machine_arch.clone(),
            system_info: domain.system_info.clone(),
            python_info: domain.python_info.clone(),
        })
    }

    fn into_domain(self) -> Result<Machine, MapError> {
        Ok(Machine {
            uid: Identity::Supplied(self.uid),
            cpu_frequency: u32::try_from(self.cpu_frequency)?,
            cpu_vendor: self.cpu_vendor,
            cpu_count: u32::try_from(self.cpu_count)?,
            cpu_type: self.cpu_type,
            total_ram: u64::try_from(self.total_ram)?,
            hostname: self.hostname,
            machine_type: self.machine_type,
            machine_arch: self.machine_arch,
            system_info: self.system_info,
            python_info: self.python_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> Machine {
        Machine::builder()
            .cpu_frequency(2400)
            .cpu_vendor("GenuineIntel")
            .cpu_count(8)
            .cpu_type("x86_64")
            .total_ram(16_384)
            .hostname("ci-runner-01")
            .machine_type("physical")
            .machine_arch("amd64")
            .system_info("Linux 6.1")
            .python_info("3.12.1")
            .build()
            .unwrap()
    }

    #[test]
    fn should_roundtrip_machine_through_record() {
        let domain = machine();
        let record = MachineRecord::from_domain(&domain).unwrap();
        let restored = record.clone().into_domain().unwrap();
        assert_eq!(restored, domain);
        // idempotent transcoding: mapping the restored entity again
        // yields the same record
        assert_eq!(MachineRecord::from_domain(&restored).unwrap(), record);
    }

    #[test]
    fn should_keep_derived_identity_value() {
        let domain = machine();
        assert!(domain.uid.is_derived());
        let record = MachineRecord::from_domain(&domain).unwrap();
        assert_eq!(record.uid, domain.uid.as_str());
        let restored = record.into_domain().unwrap();
        assert_eq!(restored.uid, domain.uid);
    }

    #[test]
    fn should_fail_on_negative_numeric_column() {
        let mut record = MachineRecord::from_domain(&machine()).unwrap();
        record.cpu_count = -1;
        assert!(matches!(record.into_domain(), Err(MapError::Range(_))));
    }
}
