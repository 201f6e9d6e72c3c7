//! Unit tests for message typing and the frame codec.

use gw_core::EntityId;

use crate::codec::{FRAME_VERSION, decode_frame, encode_frame};
use crate::message::*;
use crate::WireError;

fn sample_batch() -> Vec<Envelope> {
    vec![
        Envelope::new(
            EntityId(10),
            MessageBody::AttachRequest { kind: LogicKind::SensorView },
        ),
        Envelope::new(
            EntityId(11),
            MessageBody::StateUpdate(UpdatePayload::Sensor(SensorSettings {
                active: false,
                range_m: 1_500.0,
                gain: 2.0,
            })),
        ),
        Envelope::new(
            EntityId(12),
            MessageBody::AttachResponse(AttachPayload::Tracker(TrackerMirror {
                locks: vec![LockEntry { sensor: EntityId(3), target: Some(EntityId(9)) }],
            })),
        ),
    ]
}

#[cfg(test)]
mod framing {
    use super::*;

    #[test]
    fn roundtrip_preserves_batch() {
        let batch = sample_batch();
        let frame = encode_frame(&batch).unwrap();
        assert_eq!(frame[0], FRAME_VERSION);
        let decoded = decode_frame(&frame).unwrap();
        assert_eq!(decoded, batch);
    }

    #[test]
    fn empty_batch_roundtrips() {
        let frame = encode_frame(&[]).unwrap();
        assert!(decode_frame(&frame).unwrap().is_empty());
    }

    #[test]
    fn empty_frame_rejected() {
        assert!(matches!(decode_frame(&[]), Err(WireError::EmptyFrame)));
    }

    #[test]
    fn version_mismatch_rejected() {
        let mut frame = encode_frame(&sample_batch()).unwrap();
        frame[0] = FRAME_VERSION + 1;
        let err = decode_frame(&frame).unwrap_err();
        assert!(matches!(err, WireError::VersionMismatch { got, .. } if got == FRAME_VERSION + 1));
    }

    #[test]
    fn truncated_frame_rejected_whole() {
        let frame = encode_frame(&sample_batch()).unwrap();
        // Slice off the tail so the last message is unreadable; none of the
        // batch may survive.
        let cut = &frame[..frame.len() - 3];
        assert!(matches!(decode_frame(cut), Err(WireError::Codec(_))));
    }

    #[test]
    fn garbage_rejected() {
        let garbage = [FRAME_VERSION, 0xde, 0xad, 0xbe, 0xef];
        assert!(decode_frame(&garbage).is_err());
    }
}

#[cfg(test)]
mod typing {
    use super::*;

    #[test]
    fn envelope_kind_follows_body() {
        let batch = sample_batch();
        assert_eq!(batch[0].kind(), LogicKind::SensorView);
        assert_eq!(batch[1].kind(), LogicKind::SensorView);
        assert_eq!(batch[2].kind(), LogicKind::Tracker);
    }

    #[test]
    fn payload_kind_mapping_is_total() {
        let updates = [
            UpdatePayload::Sensor(SensorSettings::default()),
            UpdatePayload::Countermeasure(CountermeasureSettings::default()),
            UpdatePayload::TrackerLock(LockEntry { sensor: EntityId(1), target: None }),
            UpdatePayload::Search(SearchSettings::default()),
            UpdatePayload::Iff(IffSettings::default()),
        ];
        let kinds: Vec<LogicKind> = updates.iter().map(|u| u.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                LogicKind::SensorView,
                LogicKind::CountermeasureView,
                LogicKind::Tracker,
                LogicKind::SearchDirector,
                LogicKind::IffReflector,
            ]
        );
    }

    #[test]
    fn sensor_clamping() {
        let s = SensorSettings { active: true, range_m: 1e9, gain: 0.0 }.clamped();
        assert_eq!(s.range_m, 50_000.0);
        assert_eq!(s.gain, 0.1);
    }

    #[test]
    fn countermeasure_clamping() {
        let c = CountermeasureSettings { armed: true, salvo: 100, interval_secs: 0.0 }.clamped();
        assert_eq!(c.salvo, 8);
        assert_eq!(c.interval_secs, 0.5);
    }

    #[test]
    fn value_equality_for_dedup() {
        let a = Envelope::new(
            EntityId(5),
            MessageBody::StateUpdate(UpdatePayload::Iff(IffSettings {
                codes: vec!["CIV-1".into()],
            })),
        );
        let b = a.clone();
        assert_eq!(a, b);
    }
}
