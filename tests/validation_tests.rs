use salon_booking_bot::database::models::Category;
use salon_booking_bot::utils::validation::*;

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_valid_phone_numbers() {
        let cases = vec![
            ("+79991234567", "+79991234567"),
            ("89991234567", "+79991234567"),
            ("79991234567", "+79991234567"),
            ("9991234567", "+79991234567"),
            ("8 (999) 123-45-67", "+79991234567"),
            ("+7 (999) 123-45-67", "+79991234567"),
            ("  +380 44 123 4567 ", "+380441234567"),
            ("+123456789012345", "+123456789012345"),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize_phone(input).unwrap(), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_invalid_phone_numbers() {
        let invalid = vec![
            "",
            "   ",
            "phone",
            "12345",
            "+123456789",        // 9 digits
            "+1234567890123456", // 16 digits
            "59991234567",       // 11 digits, not a Russian prefix
            "+7 999 123 45 67 ext. 2",
            "8-999-123-45-67#",
            "++79991234567",
        ];

        for input in invalid {
            assert!(normalize_phone(input).is_err(), "Should reject phone: {input:?}");
        }
    }

    #[test]
    fn test_prices_and_durations() {
        assert_eq!(validate_price("1").unwrap(), 1);
        assert_eq!(validate_price("1000000").unwrap(), 1_000_000);
        for input in ["", "0", "-1", "1000001", "1 500", "1500 руб.", "15.5"] {
            assert!(validate_price(input).is_err(), "Should reject price: {input:?}");
        }

        assert_eq!(validate_duration("1440").unwrap(), 1440);
        for input in ["", "0", "1441", "полчаса", "1.5"] {
            assert!(validate_duration(input).is_err(), "Should reject duration: {input:?}");
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(validate_master_name(" Анна ").unwrap(), "Анна");
        assert!(validate_master_name("").is_err());
        assert!(validate_service_name("Гель-лак - акция").is_err());
        assert!(validate_service_name("Гель-лак-акция").is_ok());
        assert!(validate_service_name("Маникюр, покрытие").is_err());
        assert!(validate_master_name("Анна, старший мастер").is_err());
    }

    #[test]
    fn test_service_details() {
        let details = parse_service_details("Педикюр, SPA педикюр, 2500, 100").unwrap();
        assert_eq!(
            details,
            ServiceDetails {
                category: Category::Pedicure,
                name: "SPA педикюр".to_string(),
                price: 2500,
                duration: 100,
                master_id: None,
            }
        );

        let details = parse_service_details("Педикюр, SPA педикюр, 2500, 100, 4").unwrap();
        assert_eq!(details.master_id, Some(4));

        let invalid = vec![
            "Педикюр, SPA педикюр, 2500",
            "Брови, Коррекция, 500, 30",
            "Педикюр, , 2500, 100",
            "Педикюр, SPA, дорого, 100",
            "Педикюр, SPA, 2500, 0",
            "Педикюр, SPA, 2500, 100, лишнее",
        ];
        for input in invalid {
            assert!(parse_service_details(input).is_err(), "Should reject: {input:?}");
        }
    }

    #[test]
    fn test_master_details() {
        let (name, ids) = parse_master_details("Анна, 1, 3, 1").unwrap();
        assert_eq!(name, "Анна");
        assert_eq!(ids, vec![1, 3]);

        assert!(parse_master_details("Анна").is_err());
        assert!(parse_master_details("Анна,").is_err());
        assert!(parse_master_details(", 1").is_err());
        assert!(parse_master_details("Анна, один").is_err());
    }

    #[test]
    fn test_ids_and_coordinates() {
        assert_eq!(parse_id("7.").unwrap(), 7);
        assert!(parse_id("0").is_err());
        assert_eq!(parse_id_list("3,2, 3").unwrap(), vec![3, 2]);
        assert!(parse_id_list(" , ").is_err());

        assert_eq!(parse_latitude("-90").unwrap(), -90.0);
        assert_eq!(parse_longitude("180").unwrap(), 180.0);
        assert!(parse_latitude("NaN").is_err());
        assert!(parse_longitude("inf").is_err());
        assert!(parse_longitude("180.5").is_err());
    }

    #[test]
    fn test_free_text() {
        assert_eq!(validate_text("  Привет  ").unwrap(), "Привет");
        assert!(validate_text("\n\t ").is_err());
        assert!(validate_text(&"я".repeat(4096)).is_ok());
        assert!(validate_text(&"я".repeat(4097)).is_err());
        // Emoji take two UTF-16 code units each
        assert!(validate_text(&"💅".repeat(2048)).is_ok());
        assert!(validate_text(&"💅".repeat(2049)).is_err());
    }
}
