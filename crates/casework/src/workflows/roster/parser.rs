use std::collections::BTreeSet;
use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::RosterImportError;
use crate::workflows::allocation::domain::{Qualification, StaffRole, StaffUser, StaffUserId};

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Staff ID")]
    staff_id: u64,
    #[serde(rename = "Username")]
    username: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Active", default, deserialize_with = "empty_string_as_none")]
    active: Option<String>,
    #[serde(rename = "Roles", default, deserialize_with = "empty_string_as_none")]
    roles: Option<String>,
    #[serde(
        rename = "Qualifications",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    qualifications: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<StaffUser>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut staff = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;
        staff.push(row.into_staff()?);
    }

    Ok(staff)
}

impl RosterRow {
    fn into_staff(self) -> Result<StaffUser, RosterImportError> {
        // A missing Active column means the export predates deactivation
        // tracking; treat those staff as active.
        let active = match self.active.as_deref() {
            None => true,
            Some(flag) => parse_flag(flag)?,
        };

        let mut roles = BTreeSet::new();
        for token in list_tokens(self.roles.as_deref()) {
            let role = StaffRole::from_label(token)
                .ok_or_else(|| RosterImportError::UnknownRole(token.to_string()))?;
            roles.insert(role);
        }

        let mut qualifications = BTreeSet::new();
        for token in list_tokens(self.qualifications.as_deref()) {
            let qualification = Qualification::from_label(token)
                .ok_or_else(|| RosterImportError::UnknownQualification(token.to_string()))?;
            qualifications.insert(qualification);
        }

        Ok(StaffUser {
            id: StaffUserId(self.staff_id),
            username: self.username,
            name: self.name,
            active,
            roles,
            qualifications,
        })
    }
}

fn list_tokens(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn parse_flag(value: &str) -> Result<bool, RosterImportError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        other => Err(RosterImportError::InvalidFlag(other.to_string())),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Staff ID,Username,Name,Active,Roles,Qualifications\n";

    #[test]
    fn parses_roles_and_qualifications() {
        let csv = format!(
            "{HEADER}7,jharte,June Harte,yes,Assessor; Matcher,PIPE; ESAP\n"
        );
        let staff = parse_records(Cursor::new(csv)).expect("roster parses");

        assert_eq!(staff.len(), 1);
        let user = &staff[0];
        assert_eq!(user.id, StaffUserId(7));
        assert_eq!(user.username, "jharte");
        assert!(user.active);
        assert!(user.roles.contains(&StaffRole::Assessor));
        assert!(user.roles.contains(&StaffRole::Matcher));
        assert!(user.qualifications.contains(&Qualification::Pipe));
        assert!(user.qualifications.contains(&Qualification::Esap));
    }

    #[test]
    fn missing_active_column_defaults_to_active() {
        let csv = format!("{HEADER}3,plowe,Priya Lowe,,Case Manager,\n");
        let staff = parse_records(Cursor::new(csv)).expect("roster parses");

        assert!(staff[0].active);
        assert!(staff[0].qualifications.is_empty());
    }

    #[test]
    fn deactivated_flag_is_respected() {
        let csv = format!("{HEADER}4,mkay,Morgan Kay,no,Assessor,\n");
        let staff = parse_records(Cursor::new(csv)).expect("roster parses");

        assert!(!staff[0].active);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let csv = format!("{HEADER}5,tbrook,Toni Brook,yes,Janitor,\n");

        match parse_records(Cursor::new(csv)) {
            Err(RosterImportError::UnknownRole(value)) => assert_eq!(value, "Janitor"),
            other => panic!("expected unknown role error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_qualification_is_rejected() {
        let csv = format!("{HEADER}6,ndrew,Noor Drew,yes,Assessor,Astronaut\n");

        match parse_records(Cursor::new(csv)) {
            Err(RosterImportError::UnknownQualification(value)) => {
                assert_eq!(value, "Astronaut")
            }
            other => panic!("expected unknown qualification error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_flag_is_rejected() {
        let csv = format!("{HEADER}8,bvine,Billie Vine,maybe,Assessor,\n");

        match parse_records(Cursor::new(csv)) {
            Err(RosterImportError::InvalidFlag(value)) => assert_eq!(value, "maybe"),
            other => panic!("expected invalid flag error, got {other:?}"),
        }
    }
}
