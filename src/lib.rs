pub mod dice_tray;
