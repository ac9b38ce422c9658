use sone_data::{Field, Profile};
use std::convert::Infallible;

use crate::{field, parse_list, ConfigurationReader, SoneParser};

impl<C> SoneParser<'_, C>
where
    C: ConfigurationReader + ?Sized,
{
    /// Parses the profile. Every part of it is optional, so this never fails.
    pub fn parse_profile(&self) -> Profile {
        let configuration = self.configuration;
        let prefix = self.path("Profile");
        let string = |name: &str| configuration.get_string(&field(&prefix, name));
        let int = |name: &str| configuration.get_int(&field(&prefix, name));

        let fields = parse_list(
            configuration,
            &field(&prefix, "Fields"),
            "Name",
            |field_prefix, name| {
                Ok::<_, Infallible>(Field {
                    name,
                    value: configuration
                        .get_string(&field(field_prefix, "Value"))
                        .unwrap_or_default(),
                })
            },
        )
        .unwrap_or_default();

        Profile {
            first_name: string("FirstName"),
            middle_name: string("MiddleName"),
            last_name: string("LastName"),
            birth_day: int("BirthDay"),
            birth_month: int("BirthMonth"),
            birth_year: int("BirthYear"),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::configuration;
    use crate::SoneParser;

    #[test]
    fn empty_profile_is_loaded_correctly() {
        let config = configuration(&[]);
        let profile = SoneParser::new(&config, "1").parse_profile();
        assert_eq!(profile.first_name, None);
        assert_eq!(profile.middle_name, None);
        assert_eq!(profile.last_name, None);
        assert_eq!(profile.birth_day, None);
        assert_eq!(profile.birth_month, None);
        assert_eq!(profile.birth_year, None);
        assert!(profile.fields.is_empty());
    }

    #[test]
    fn filled_profile_with_fields_is_parsed_correctly() {
        let config = configuration(&[
            ("Sone/1/Profile/FirstName", Some("First")),
            ("Sone/1/Profile/MiddleName", Some("M.")),
            ("Sone/1/Profile/LastName", Some("Last")),
            ("Sone/1/Profile/BirthDay", Some("18")),
            ("Sone/1/Profile/BirthMonth", Some("12")),
            ("Sone/1/Profile/BirthYear", Some("1976")),
            ("Sone/1/Profile/Fields/0/Name", Some("Field1")),
            ("Sone/1/Profile/Fields/0/Value", Some("Value1")),
            ("Sone/1/Profile/Fields/1/Name", Some("Field2")),
            ("Sone/1/Profile/Fields/1/Value", Some("Value2")),
            ("Sone/1/Profile/Fields/2/Name", None),
        ]);
        let profile = SoneParser::new(&config, "1").parse_profile();
        assert_eq!(profile.first_name.as_deref(), Some("First"));
        assert_eq!(profile.middle_name.as_deref(), Some("M."));
        assert_eq!(profile.last_name.as_deref(), Some("Last"));
        assert_eq!(profile.birth_day, Some(18));
        assert_eq!(profile.birth_month, Some(12));
        assert_eq!(profile.birth_year, Some(1976));
        assert_eq!(profile.fields.len(), 2);
        assert_eq!(profile.fields[0].name, "Field1");
        assert_eq!(profile.fields[0].value, "Value1");
        assert_eq!(profile.fields[1].name, "Field2");
        assert_eq!(profile.fields[1].value, "Value2");
    }

    #[test]
    fn field_without_value_is_empty() {
        let config = configuration(&[("Sone/1/Profile/Fields/0/Name", Some("Field1"))]);
        let profile = SoneParser::new(&config, "1").parse_profile();
        assert_eq!(profile.fields.len(), 1);
        assert_eq!(profile.fields[0].value, "");
    }

    #[test]
    fn fields_after_gap_are_ignored() {
        let config = configuration(&[
            ("Sone/1/Profile/Fields/0/Name", Some("Field1")),
            ("Sone/1/Profile/Fields/2/Name", Some("Field3")),
        ]);
        let profile = SoneParser::new(&config, "1").parse_profile();
        assert_eq!(profile.fields.len(), 1);
        assert_eq!(profile.fields[0].name, "Field1");
    }

    #[test]
    fn unparseable_birth_day_is_unset() {
        let config = configuration(&[("Sone/1/Profile/BirthDay", Some("18th"))]);
        let profile = SoneParser::new(&config, "1").parse_profile();
        assert_eq!(profile.birth_day, None);
    }
}
