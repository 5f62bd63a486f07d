use pretty_assertions::assert_eq;

use super::*;

#[derive(Debug, Clone, Copy)]
enum Step {
    Arm,
    Press(Player),
}

const STEPS: [Step; 3] = [Step::Arm, Step::Press(Player::One), Step::Press(Player::Two)];

#[test]
fn new_scoreboard_is_dark_and_unarmed() {
    let scoreboard = Scoreboard::new();

    assert_eq!(scoreboard.lights(), [PlayerLight::Off; 2]);
    assert!(scoreboard.frame().is_dark());
    assert_eq!(scoreboard.winner(), None);
}

#[test]
fn arm_puts_both_players_in_standby() {
    let mut scoreboard = Scoreboard::new();
    scoreboard.arm();

    for player in Player::ALL {
        assert!(scoreboard.in_standby(player));
        assert!(!scoreboard.has_won(player));
        assert_eq!(scoreboard.light(player), PlayerLight::Standby);
    }
    assert_eq!(scoreboard.frame().blue, [true; 2]);
}

#[test]
fn first_press_wins_and_the_second_is_ignored() {
    let mut scoreboard = Scoreboard::new();
    scoreboard.arm();

    assert_eq!(scoreboard.press(Player::Two), Verdict::Won(Player::Two));
    assert_eq!(scoreboard.press(Player::One), Verdict::NotArmed);

    assert_eq!(scoreboard.winner(), Some(Player::Two));
    assert_eq!(scoreboard.light(Player::One), PlayerLight::Lost);
    assert_eq!(scoreboard.light(Player::Two), PlayerLight::Won);
}

#[test]
fn winner_pressing_again_changes_nothing() {
    let mut scoreboard = Scoreboard::new();
    scoreboard.arm();
    scoreboard.press(Player::One);
    let decided = scoreboard;

    assert_eq!(scoreboard.press(Player::One), Verdict::NotArmed);
    assert_eq!(scoreboard, decided);
}

#[test]
fn opponent_win_blocks_a_press_even_when_armed() {
    let mut scoreboard = Scoreboard::new();
    scoreboard.arm();
    scoreboard.round.won[Player::Two.index()] = true;

    assert_eq!(scoreboard.press(Player::One), Verdict::AlreadyDecided);
    assert!(!scoreboard.has_won(Player::One));
    assert_eq!(scoreboard.light(Player::One), PlayerLight::Standby);
}

#[test]
fn blank_keeps_the_round_and_disarms_the_lights() {
    let mut scoreboard = Scoreboard::new();
    scoreboard.arm();
    scoreboard.press(Player::One);

    scoreboard.blank();

    assert!(scoreboard.frame().is_dark());
    assert_eq!(scoreboard.winner(), Some(Player::One));
    assert_eq!(scoreboard.press(Player::Two), Verdict::NotArmed);
}

#[test]
fn press_after_a_fresh_arm_decides_normally() {
    let mut scoreboard = Scoreboard::new();
    scoreboard.arm();
    scoreboard.press(Player::One);

    scoreboard.arm();

    assert_eq!(scoreboard.press(Player::Two), Verdict::Won(Player::Two));
    assert!(!scoreboard.has_won(Player::One));
}

#[test]
fn at_most_one_winner_for_every_short_sequence() {
    const LENGTH: u32 = 7;

    for code in 0..3usize.pow(LENGTH) {
        let mut scoreboard = Scoreboard::new();
        let mut decided = false;
        let mut rest = code;

        for _ in 0..LENGTH {
            let step = STEPS[rest % 3];
            rest /= 3;

            match step {
                Step::Arm => {
                    scoreboard.arm();
                    decided = false;
                }
                Step::Press(player) => {
                    let armed = scoreboard.light(player) == PlayerLight::Standby;
                    let verdict = scoreboard.press(player);
                    if armed && !decided {
                        assert_eq!(verdict, Verdict::Won(player), "sequence {code}");
                        decided = true;
                    } else {
                        assert_ne!(verdict, Verdict::Won(player), "sequence {code}");
                    }
                }
            }

            let winners = Player::ALL
                .into_iter()
                .filter(|p| scoreboard.has_won(*p))
                .count();
            assert!(winners <= 1, "sequence {code}");

            if let Some(winner) = scoreboard.winner() {
                assert_eq!(scoreboard.light(winner), PlayerLight::Won);
                assert_eq!(scoreboard.light(winner.other()), PlayerLight::Lost);
            }
        }
    }
}

#[test]
fn frame_maps_lights_to_colours() {
    let frame = LedFrame::from_lights([PlayerLight::Lost, PlayerLight::Won]);

    assert_eq!(frame.rgb(Player::One), (true, false, false));
    assert_eq!(frame.rgb(Player::Two), (false, true, false));
    assert_eq!(LedFrame::from_lights([PlayerLight::Off; 2]), LedFrame::OFF);
}
