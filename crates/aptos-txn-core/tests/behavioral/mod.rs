//! Behavioral tests for the transaction core.
//!
//! These tests pin wire bytes against known transactions and check the
//! verification rules end to end, without a live network.

mod known_transactions {
    use aptos_txn_core::account::{Account, Ed25519Account};
    use aptos_txn_core::transaction::{
        sign_multi_agent_transaction, sign_transaction, EntryFunction, MultiAgentRawTransaction,
        RawTransaction, SignedTransaction, TransactionAuthenticator,
    };
    use aptos_txn_core::types::{AccountAddress, ChainId, TypeTag};

    const SENDER: &str = "0x7deeccb1080854f499ec8b4c1b213b82c5e34b925cf6875fec02d4b77adbd2d6";
    const SENDER_KEY: &str = "9bf49a6a0755f953811fce125f2683d50429c3bb49e074147e0089a52eae155f";
    const RECEIVER: &str = "0x2d133ddd281bb6205558357cc6ac75661817e9aaeac3afebc32842759cbf7fa9";
    const RECEIVER_KEY: &str = "0564f879d27ae3c02ce82834acfa8c793a629f2ca0de6919610be82f411326be";

    const COIN_TRANSFER_RAW: &str =
        "7deeccb1080854f499ec8b4c1b213b82c5e34b925cf6875fec02d4b77adbd2d6\
        0b00000000000000\
        02\
        0000000000000000000000000000000000000000000000000000000000000001\
        04636f696e\
        087472616e73666572\
        01\
        070000000000000000000000000000000000000000000000000000000000000001\
        0a6170746f735f636f696e\
        094170746f73436f696e\
        00\
        02\
        202d133ddd281bb6205558357cc6ac75661817e9aaeac3afebc32842759cbf7fa9\
        088813000000000000\
        d007000000000000\
        0100000000000000\
        d202964900000000\
        04";

    const DIRECT_TRANSFER_MULTI_AGENT_SIGNED: &str =
        "7deeccb1080854f499ec8b4c1b213b82c5e34b925cf6875fec02d4b77adbd2d6\
        0b00000000000000\
        02\
        0000000000000000000000000000000000000000000000000000000000000003\
        05746f6b656e\
        166469726563745f7472616e736665725f736372697074\
        00\
        05\
        207deeccb1080854f499ec8b4c1b213b82c5e34b925cf6875fec02d4b77adbd2d6\
        0b0a636f6c6c656374696f6e\
        0605746f6b656e\
        080000000000000000\
        080100000000000000\
        d007000000000000\
        0100000000000000\
        d202964900000000\
        04\
        02\
        00\
        20b9c6ee1630ef3e711144a648db06bbb2284f7274cfbee53ffcee503cc1a49200\
        40\
        68dd521220a8d568588d8643f905ee49da68453acf2e4f0afb989dd1c2ce8db9\
        1a10fb87c162054d3f791e79579f5b6d356c8333a6afb29c7f724bf017f5b708\
        012d133ddd281bb6205558357cc6ac75661817e9aaeac3afebc32842759cbf7fa9\
        01\
        00\
        20aef3f4a4b8eca1dfc343361bf8e436bd42de9259c04b8314eb8e2054dd6e82ab\
        40\
        ee1b469340948b2d17cbcd75c456232b7e4e016918f490f9d2f4cecb2093bc04\
        4152316a9944eb64967131cbd2487a2920919af1595e8b8b09f7d88746778f0d";

    fn sender() -> Ed25519Account {
        Ed25519Account::from_private_key_hex(SENDER_KEY)
            .unwrap()
            .with_address(AccountAddress::from_hex(SENDER).unwrap())
    }

    fn receiver() -> Ed25519Account {
        Ed25519Account::from_private_key_hex(RECEIVER_KEY)
            .unwrap()
            .with_address(AccountAddress::from_hex(RECEIVER).unwrap())
    }

    fn coin_transfer() -> RawTransaction {
        let payload = EntryFunction::coin_transfer(
            TypeTag::aptos_coin(),
            AccountAddress::from_hex(RECEIVER).unwrap(),
            5000,
        )
        .unwrap();
        RawTransaction::new(
            AccountAddress::from_hex(SENDER).unwrap(),
            11,
            payload.into(),
            2000,
            1,
            1_234_567_890,
            ChainId::new(4),
        )
    }

    #[test]
    fn test_coin_transfer_exact_bytes() {
        let bytes = coin_transfer().to_bcs().unwrap();
        assert_eq!(hex::encode(&bytes), COIN_TRANSFER_RAW);
        assert_eq!(RawTransaction::from_bcs(&bytes).unwrap(), coin_transfer());
    }

    #[test]
    fn test_coin_transfer_signed_roundtrip_verifies() {
        let signed = sign_transaction(&coin_transfer(), &sender()).unwrap();
        let bytes = signed.to_bcs().unwrap();
        assert!(hex::encode(&bytes).starts_with(COIN_TRANSFER_RAW));

        let decoded = SignedTransaction::from_bcs(&bytes).unwrap();
        assert_eq!(decoded, signed);
        assert!(decoded.verify());
        // Ed25519 signing is deterministic, so the hash is too.
        let again = sign_transaction(&coin_transfer(), &sender()).unwrap();
        assert_eq!(again.hash().unwrap(), signed.hash().unwrap());
    }

    #[test]
    fn test_token_direct_transfer_multi_agent() {
        let sender = sender();
        let receiver = receiver();
        let payload = EntryFunction::builder("0x3::token::direct_transfer_script")
            .unwrap()
            .arg(&sender.address())
            .unwrap()
            .arg("collection")
            .unwrap()
            .arg("token")
            .unwrap()
            .arg(&0u64)
            .unwrap()
            .arg(&1u64)
            .unwrap()
            .build();
        let raw_txn = RawTransaction::new(
            sender.address(),
            11,
            payload.into(),
            2000,
            1,
            1_234_567_890,
            ChainId::new(4),
        );
        let multi_agent = MultiAgentRawTransaction::new(raw_txn.clone(), vec![receiver.address()]);

        let secondary: [&dyn Account; 1] = [&receiver];
        let signed = sign_multi_agent_transaction(&multi_agent, &sender, &secondary).unwrap();
        let bytes = signed.to_bcs().unwrap();
        assert_eq!(hex::encode(&bytes), DIRECT_TRANSFER_MULTI_AGENT_SIGNED);

        let raw_bytes = raw_txn.to_bcs().unwrap();
        assert_eq!(&bytes[..raw_bytes.len()], raw_bytes.as_slice());

        let decoded = SignedTransaction::from_bcs(&bytes).unwrap();
        assert_eq!(decoded, signed);
        assert!(decoded.verify());
        assert!(matches!(
            decoded.authenticator(),
            TransactionAuthenticator::MultiAgent { .. }
        ));
        assert_eq!(
            decoded.authenticator().secondary_signer_addresses(),
            &[receiver.address()]
        );
    }

    #[test]
    fn test_multi_agent_signatures_bind_secondary_addresses() {
        let sender = sender();
        let receiver = receiver();

        let other = MultiAgentRawTransaction::new(coin_transfer(), vec![AccountAddress::ONE]);
        let mislabeled = sign_multi_agent_transaction(&other, &sender, &[&receiver]).unwrap();
        let TransactionAuthenticator::MultiAgent {
            sender: sender_auth,
            secondary_signers,
            ..
        } = mislabeled.authenticator().clone()
        else {
            panic!("expected multi-agent authenticator");
        };
        let relabeled = SignedTransaction::new(
            coin_transfer(),
            TransactionAuthenticator::multi_agent(
                sender_auth,
                vec![(receiver.address(), secondary_signers[0].clone())],
            ),
        );
        assert!(!relabeled.verify());
    }
}

mod fee_payer {
    use aptos_txn_core::account::{Account, Ed25519Account, Secp256k1Account};
    use aptos_txn_core::transaction::{
        sign_fee_payer_transaction, EntryFunction, FeePayerRawTransaction, SignedTransaction,
        SigningMessage, TransactionAuthenticator, TransactionBuilder,
    };
    use aptos_txn_core::types::{AccountAddress, ChainId, TypeTag};

    fn raw_txn(sender: AccountAddress) -> aptos_txn_core::transaction::RawTransaction {
        TransactionBuilder::new()
            .sender(sender)
            .sequence_number(3)
            .payload(
                EntryFunction::coin_transfer(TypeTag::aptos_coin(), AccountAddress::ONE, 10)
                    .unwrap()
                    .into(),
            )
            .expiration_timestamp_secs(1_900_000_000)
            .chain_id(ChainId::testnet())
            .build()
            .unwrap()
    }

    #[test]
    fn test_sender_signs_before_fee_payer_is_known() {
        let sender = Ed25519Account::generate();
        let payer = Secp256k1Account::generate().unwrap();
        let raw = raw_txn(sender.address());

        // The sender signs with the 0x0 placeholder.
        let placeholder = FeePayerRawTransaction::new(raw.clone(), vec![], None);
        let sender_auth = sender.sign_message(&placeholder.keyed().unwrap()).unwrap();

        // The fee payer later signs over its own address.
        let actual = placeholder.with_fee_payer(payer.address());
        let payer_auth = payer.sign_message(&actual.keyed().unwrap()).unwrap();

        let signed = SignedTransaction::new(
            raw,
            TransactionAuthenticator::fee_payer(sender_auth, vec![], payer.address(), payer_auth),
        );
        let decoded = SignedTransaction::from_bcs(&signed.to_bcs().unwrap()).unwrap();
        assert!(decoded.verify());
        assert_eq!(decoded.authenticator().fee_payer_address(), Some(payer.address()));
    }

    #[test]
    fn test_tampered_fee_payer_fails() {
        let sender = Ed25519Account::generate();
        let payer = Ed25519Account::generate();
        let fee_payer_txn = FeePayerRawTransaction::new(raw_txn(sender.address()), vec![], None);
        let signed = sign_fee_payer_transaction(&fee_payer_txn, &sender, &[], &payer).unwrap();
        assert!(signed.verify());

        let TransactionAuthenticator::FeePayer {
            sender: sender_auth,
            fee_payer_signer,
            ..
        } = signed.authenticator().clone()
        else {
            panic!("expected fee payer authenticator");
        };
        let tampered = SignedTransaction::new(
            signed.raw_transaction().clone(),
            TransactionAuthenticator::fee_payer(
                sender_auth,
                vec![],
                Ed25519Account::generate().address(),
                fee_payer_signer,
            ),
        );
        assert!(!tampered.verify());
    }

    #[test]
    fn test_secondary_signers_under_fee_payer() {
        let sender = Ed25519Account::generate();
        let secondary = Secp256k1Account::generate().unwrap();
        let payer = Ed25519Account::generate();
        let fee_payer_txn = FeePayerRawTransaction::new(
            raw_txn(sender.address()),
            vec![secondary.address()],
            Some(payer.address()),
        );
        let signed =
            sign_fee_payer_transaction(&fee_payer_txn, &sender, &[&secondary], &payer).unwrap();
        assert!(signed.verify());
        assert_eq!(
            signed.authenticator().secondary_signer_addresses(),
            &[secondary.address()]
        );
    }
}

mod codec_boundaries {
    use aptos_txn_core::bcs::{self, BcsError, Deserializer};
    use aptos_txn_core::crypto::Ed25519PublicKey;
    use aptos_txn_core::AptosError;

    #[test]
    fn test_uleb128_past_32_bits_overflows() {
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        assert_eq!(
            Deserializer::new(&bytes).read_uleb128(),
            Err(BcsError::Uleb128Overflow)
        );
        assert!(matches!(
            bcs::from_bytes::<Vec<u8>>(&bytes),
            Err(AptosError::Bcs(BcsError::Uleb128Overflow))
        ));
    }

    #[test]
    fn test_short_key_is_not_padded() {
        let mut bytes = vec![31u8];
        bytes.extend_from_slice(&[7u8; 31]);
        assert!(matches!(
            bcs::from_bytes::<Ed25519PublicKey>(&bytes),
            Err(AptosError::Bcs(BcsError::LengthMismatch {
                expected: 32,
                actual: 31
            }))
        ));
    }

    #[test]
    fn test_truncated_input_fails() {
        assert!(matches!(
            bcs::from_bytes::<u64>(&[1, 2, 3]),
            Err(AptosError::Bcs(BcsError::UnexpectedEndOfInput { .. }))
        ));
    }
}

mod properties {
    use aptos_txn_core::bcs::{Deserializer, Serializer};
    use aptos_txn_core::crypto::{
        Ed25519PrivateKey, MultiEd25519PublicKey, MultiEd25519Signature,
    };
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    proptest! {
        #[test]
        fn uleb128_is_minimal(value in any::<u32>()) {
            let mut ser = Serializer::new();
            ser.serialize_uleb128(value);
            let bytes = ser.into_bytes();

            let significant_bits = 32 - value.leading_zeros() as usize;
            let expected_len = significant_bits.div_ceil(7).max(1);
            prop_assert_eq!(bytes.len(), expected_len);

            let mut de = Deserializer::new(&bytes);
            prop_assert_eq!(de.read_uleb128(), Ok(value));
            prop_assert!(de.is_empty());
        }

        #[test]
        fn map_encoding_ignores_insertion_order(
            entries in prop::collection::btree_map(any::<u16>(), any::<u8>(), 0..24)
        ) {
            let forward: Vec<(&u16, &u8)> = entries.iter().collect();
            let backward: Vec<(&u16, &u8)> = entries.iter().rev().collect();

            let mut a = Serializer::new();
            a.serialize_map(forward).unwrap();
            let mut b = Serializer::new();
            b.serialize_map(backward).unwrap();
            let bytes = a.into_bytes();
            prop_assert_eq!(&bytes, &b.into_bytes());

            let decoded: BTreeMap<u16, u8> = Deserializer::new(&bytes).read_map().unwrap();
            prop_assert_eq!(decoded, entries);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn bitmap_popcount_must_match_signatures(bitmap in any::<u32>(), count in 0usize..4) {
            let key = Ed25519PrivateKey::generate();
            let mut bytes = Vec::new();
            for _ in 0..count {
                bytes.extend_from_slice(&key.sign(b"m").to_bytes());
            }
            bytes.extend_from_slice(&bitmap.to_be_bytes());

            let decoded = MultiEd25519Signature::from_bytes(&bytes);
            prop_assert_eq!(decoded.is_ok(), bitmap.count_ones() as usize == count);
        }

        #[test]
        fn threshold_law((num_keys, threshold, signers) in (2u8..=5)
            .prop_flat_map(|n| (Just(n), 1..=n, 1..=n)))
        {
            let keys: Vec<_> = (0..num_keys).map(|_| Ed25519PrivateKey::generate()).collect();
            let public_key = MultiEd25519PublicKey::new(
                keys.iter().map(Ed25519PrivateKey::public_key).collect(),
                threshold,
            ).unwrap();

            let message = b"threshold";
            let signatures = (0..signers)
                .map(|i| (i, keys[usize::from(i)].sign(message)))
                .collect();
            let signature = MultiEd25519Signature::new(signatures).unwrap();

            prop_assert_eq!(public_key.verify(message, &signature), signers >= threshold);
        }
    }
}
