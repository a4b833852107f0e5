//! End-to-end wallet scenarios spanning address derivation, the coin
//! lifecycle, and the payout/stake transaction types (`spec.md` §8).

use std::collections::HashSet;

use rand::rngs::OsRng;

use spark_core::address::{AddressParameters, SpendKey};
use spark_core::algebra::{Point, Scalar};
use spark_core::coin::{delegate, Coin, CoinParameters, CoinType};
use spark_core::transactions::payout::{PayoutParameters, PayoutTransaction};
use spark_core::transactions::stake::{StakeParameters, StakeTransaction};

fn address_params() -> AddressParameters {
    AddressParameters::new(
        Point::hash_to_point(b"e2e addr F", &[]),
        Point::hash_to_point(b"e2e addr G", &[]),
        8,
    )
    .unwrap()
}

#[test]
fn a_payout_coin_is_publicly_verifiable_without_the_pay_proof() {
    let mut rng = OsRng;
    let spend_key = SpendKey::random(address_params(), &mut rng);
    let address = spend_key
        .to_full_view_key()
        .to_incoming_view_key()
        .derive_address(0)
        .unwrap();

    let params = PayoutParameters {
        f: Point::hash_to_point(b"e2e payout F", &[]),
        g: Point::hash_to_point(b"e2e payout G", &[]),
        h: Point::hash_to_point(b"e2e payout H", &[]),
        u: Point::hash_to_point(b"e2e payout U", &[]),
        value_bytes: 4,
        memo_bytes: 16,
    };
    let k = Scalar::hash_to_scalar(b"payout_k", &[]);
    let tx = PayoutTransaction::construct(&params, &address, 500, k, &mut rng).unwrap();
    tx.verify(&params).unwrap();

    let coin_params = CoinParameters {
        f: params.f,
        g: params.g,
        h: params.h,
        u: params.u,
        value_bytes: params.value_bytes,
        memo_bytes: params.memo_bytes,
    };
    tx.output.verify_payout(&coin_params, &address, k).unwrap();
}

#[test]
fn a_delegated_coin_is_spent_anonymously_in_a_stake_transaction() {
    let mut rng = OsRng;
    let f = Point::hash_to_point(b"e2e stake F", &[]);
    let g = Point::hash_to_point(b"e2e stake G", &[]);
    let h = Point::hash_to_point(b"e2e stake H", &[]);
    let u = Point::hash_to_point(b"e2e stake U", &[]);
    let stake_params = StakeParameters::new(f, g, h, u, 4, 2, 2, 2).unwrap();
    let coin_params = CoinParameters {
        f,
        g,
        h,
        u,
        value_bytes: 4,
        memo_bytes: 16,
    };

    let spend_key = SpendKey::random(address_params(), &mut rng);
    let fvk = spend_key.to_full_view_key();
    let ivk = fvk.to_incoming_view_key();
    let address = ivk.derive_address(0).unwrap();

    let mut inputs: Vec<Coin> = (0..4u64)
        .map(|i| {
            let decoy_spend = SpendKey::random(address_params(), &mut rng);
            let decoy_address = decoy_spend
                .to_full_view_key()
                .to_incoming_view_key()
                .derive_address(0)
                .unwrap();
            Coin::construct(
                &coin_params,
                &decoy_address,
                CoinType::Standard,
                i,
                "decoy",
                None,
                &mut rng,
            )
            .unwrap()
        })
        .collect();

    let spend_index = 3usize;
    inputs[spend_index] = Coin::construct(
        &coin_params,
        &address,
        CoinType::Standard,
        3,
        "stake coin",
        None,
        &mut rng,
    )
    .unwrap();

    let identified = ivk.identify(&coin_params, &inputs[spend_index], 4).unwrap();
    let recovered = fvk.recover(&coin_params, identified).unwrap();
    let delegation = delegate(&coin_params, &fvk, &recovered, b"end-to-end stake");

    let tx = StakeTransaction::construct(
        &stake_params,
        &fvk,
        &spend_key,
        &inputs,
        spend_index,
        1,
        &recovered,
        &delegation,
        &mut rng,
    )
    .unwrap();

    let mut seen_tags = HashSet::new();
    tx.verify(&stake_params, &inputs, &mut seen_tags).unwrap();

    // The same tag can never be spent twice.
    assert!(tx.verify(&stake_params, &inputs, &mut seen_tags).is_err());
}
