#[cfg(test)]
mod barcode_proptests {

    use proptest::prelude::*;

    use barline::code128::checksum;
    use barline::*;

    pub fn digits_strategy(len: usize) -> impl Strategy<Value = String> {
        prop::collection::vec(0u8..10, len)
            .prop_map(|d| d.into_iter().map(|x| char::from(b'0' + x)).collect())
    }

    pub fn code_set_strategy() -> BoxedStrategy<CodeSet> {
        prop_oneof![Just(CodeSet::A), Just(CodeSet::B), Just(CodeSet::C)].boxed()
    }

    proptest! {
        #[test]
        fn proptest_ean13(prefix in digits_strategy(12)) {
            let pattern = encode_ean(&prefix).unwrap();
            prop_assert_eq!(pattern.len(), 95);
            let decoded = decode_ean(&pattern).unwrap();
            prop_assert!(decoded.starts_with(&prefix));
            prop_assert!(validate_ean(&decoded));
            prop_assert_eq!(decode_ean(&pattern.reversed()).unwrap(), decoded);
        }

        #[test]
        fn proptest_ean8(prefix in digits_strategy(7)) {
            let pattern = encode_ean(&prefix).unwrap();
            let decoded = decode_ean(&pattern.reversed()).unwrap();
            let check = checksum_ean(&prefix).unwrap();
            prop_assert_eq!(decoded, format!("{prefix}{check}"));
        }

        #[test]
        fn proptest_addons(five in digits_strategy(5), two in digits_strategy(2)) {
            prop_assert_eq!(decode_ean(&encode_ean(&five).unwrap()).unwrap(), five.clone());
            prop_assert_eq!(decode_ean(&encode_ean(&two).unwrap()).unwrap(), two.clone());
            prop_assert_eq!(decode_ean(&encode_ean(&five).unwrap().reversed()).unwrap(), five);
        }

        #[test]
        fn proptest_ean_check_digit_is_detected(prefix in digits_strategy(12), bump in 1u8..10) {
            let check = checksum_ean(&prefix).unwrap();
            let wrong = format!("{prefix}{}", (check + bump) % 10);
            prop_assert!(!validate_ean(&wrong));
        }

        #[test]
        fn proptest_code128_text(text in "[ -~]{1,40}") {
            let seq = encode_code128_text(&text).unwrap();
            let modules = seq.to_modules();
            prop_assert_eq!(modules.len(), seq.symbols().len() * 11 + 2);
            let read = Code128Sequence::from_modules(&modules).unwrap();
            prop_assert_eq!(&read, &seq);
            prop_assert_eq!(decode_code128(&read), text.clone());
            let reversed = Code128Sequence::from_modules(&modules.reversed()).unwrap();
            prop_assert_eq!(decode_code128(&reversed), text);
        }

        #[test]
        fn proptest_code128_values(
            set in code_set_strategy(),
            values in prop::collection::vec(0u8..=102, 1..30),
        ) {
            let seq = encode_code128(set, &values).unwrap();
            let symbols = seq.symbols();
            prop_assert_eq!(symbols[0], set.start_value());
            prop_assert_eq!(seq.data(), &values[..]);
            prop_assert_eq!(seq.checksum(), checksum(set.start_value(), &values));
            prop_assert_eq!(*symbols.last().unwrap(), 106);
            // building from a finished list changes nothing
            prop_assert_eq!(encode_code128(set, symbols).unwrap(), seq.clone());
            prop_assert_eq!(Code128Sequence::from_modules(&seq.to_modules()).unwrap(), seq);
        }
    }
}

#[cfg(test)]
mod scenario_tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use barline::ean::{EanKind, Encoding, parity_pattern};
    use barline::*;

    const EAN13_4006381333931: &str = "10100011010100111010111101111010001001011001101010100001010000101000010111010010000101100110101";
    const EAN8_96385074: &str =
        "1010001011010111101111010110111010101001110111001010001001011100101";

    #[test]
    fn ean13_full_payload() {
        assert_eq!(checksum_ean("400638133393").unwrap(), 1);
        let pattern = encode_ean("4006381333931").unwrap();
        assert_eq!(pattern.to_string(), EAN13_4006381333931);
        assert_eq!(decode_ean(&pattern).unwrap(), "4006381333931");
        // the twelve digit prefix gets the same symbol
        assert_eq!(encode_ean("400638133393").unwrap(), pattern);
    }

    #[test]
    fn ean8_from_seven_digits() {
        assert_eq!(checksum_ean("9638507").unwrap(), 4);
        let pattern = encode_ean("9638507").unwrap();
        assert_eq!(pattern.to_string(), EAN8_96385074);
        assert_eq!(decode_ean(&pattern).unwrap(), "96385074");
    }

    #[test]
    fn code128_mixed_text() {
        let seq = encode_code128_text("Hi345").unwrap();
        assert_eq!(seq.symbols(), &[104, 40, 73, 19, 20, 21, 17, 106]);
        assert_eq!(seq.to_modules().len(), 90);
        assert_eq!(decode_code128(&seq), "Hi345");
    }

    #[test]
    fn gs1_gtin_and_batch() {
        let registry = AiRegistry::builtin();
        let seq = Gs1Builder::new(&registry)
            .field("01", "00012345678905")
            .unwrap()
            .field("10", "AB123")
            .unwrap()
            .build()
            .unwrap();
        let text = decode_code128(&seq);
        assert_eq!(
            get_ai_data(&text, &registry).unwrap(),
            vec!["0100012345678905", "10AB123"]
        );
        let read = decode_code128_modules(&seq.to_modules()).unwrap();
        assert_eq!(read, text);
    }

    #[test]
    fn reversed_ean13_scan() {
        let pattern: BarcodePattern = EAN13_4006381333931.parse().unwrap();
        assert_eq!(decode_ean(&pattern.reversed()).unwrap(), "4006381333931");
    }

    #[test]
    fn addon5_parity_from_checksum() {
        assert_eq!(checksum_ean("12345").unwrap(), 1);
        use Encoding::{G, L};
        assert_eq!(parity_pattern("12345").unwrap(), vec![G, L, G, L, L]);
        let pattern = encode_ean("12345").unwrap();
        assert_eq!(EanKind::for_modules(pattern.len()), Some(EanKind::AddOn5));
        assert_eq!(decode_ean(&pattern).unwrap(), "12345");
    }

    #[test_case("123", ErrorKind::Structural ; "no layout for three digits")]
    #[test_case("40063813339A", ErrorKind::Structural ; "letter in payload")]
    #[test_case("4006381333932", ErrorKind::Checksum ; "wrong check digit")]
    #[test_case("96385075", ErrorKind::Checksum ; "wrong ean8 check digit")]
    fn ean_rejections(digits: &str, kind: ErrorKind) {
        let result = encode_ean(digits);
        assert_eq!(Check::of(&result).kind, Some(kind));
    }

    #[test]
    fn code128_rejections() {
        assert_eq!(
            encode_code128(CodeSet::B, &[40, 107]).unwrap_err(),
            BarcodeError::SymbolOutOfRange {
                index: 1,
                value: 107
            }
        );
        assert_eq!(
            encode_code128(CodeSet::B, &[40, 103]).unwrap_err(),
            BarcodeError::MisplacedControl {
                index: 1,
                value: 103
            }
        );
        assert_eq!(
            encode_code128(CodeSet::B, &[]).unwrap_err().kind(),
            ErrorKind::Structural
        );
        let err = encode_code128(CodeSet::B, &[104, 40, 73, 19, 20, 21, 18, 106]).unwrap_err();
        assert_eq!(
            err,
            BarcodeError::Checksum {
                expected: 17,
                found: 18
            }
        );
    }

    #[test]
    fn unreadable_patterns() {
        let blank = BarcodePattern::new(vec![false; 95]);
        assert!(decode_ean(&blank).is_err());
        let short = BarcodePattern::new(vec![true; 30]);
        assert_eq!(
            Check::of(&decode_ean(&short)).kind,
            Some(ErrorKind::Structural)
        );
        let mut modules = encode_code128_text("Hi345").unwrap().to_modules().modules().to_vec();
        modules[78] = !modules[78];
        modules[89] = !modules[89];
        let broken = BarcodePattern::new(modules);
        assert_eq!(
            Check::of(&decode_code128_modules(&broken)).kind,
            Some(ErrorKind::Orientation)
        );
    }

    #[test]
    fn gs1_field_rejections() {
        let long_batch = "X".repeat(21);
        for (ai, data) in [("01", "123"), ("10", long_batch.as_str()), ("01", "0001234567890A")] {
            let err = build_gs1(ai, data).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedField);
        }
        assert_eq!(
            build_gs1("01", "00012345678906").unwrap_err().kind(),
            ErrorKind::Checksum
        );
    }
}
