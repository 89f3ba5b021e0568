/// Declares a static global `OOK_DRIVER` instance protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `OOK_DRIVER` suitable for use in
/// interrupt-based environments, where both the main thread and an ISR need
/// to safely access the shared driver state.
///
/// # Arguments
/// - `$tx`: The concrete type of the TX pin (must implement `OutputPin`)
/// - `$ptt`: The concrete type of the PTT pin (must implement `OutputPin`)
///
/// # Example
/// ```rust
/// # use embedded_hal_mock::eh1::digital::Mock as MyPinType;
/// proflame::init_ook_driver!(MyPinType, MyPinType);
/// ```
#[macro_export]
macro_rules! init_ook_driver {
    ( $tx:ty, $ptt:ty ) => {
        pub static OOK_DRIVER: $crate::timer::GlobalDriver<$tx, $ptt> =
            $crate::timer::global_ook_driver_init();
    };
}

/// Initializes the global `OOK_DRIVER` singleton with a new driver instance.
///
/// This macro wraps construction of the `OokDriver` and stores it inside the
/// globally declared `OOK_DRIVER` created by `init_ook_driver!`. It evaluates to the
/// `Result` of driving the TX pin low.
///
/// # Arguments
/// - `$tx`: The TX pin (must implement `OutputPin`)
/// - `$ptt`: The optional PTT pin (must implement `OutputPin`)
/// - `$tpb`: Ticks per bit (e.g., 8 for 2400 baud with a ~52 µs timer)
/// - `$ptt_inverted`: Whether the PTT pin should be inverted
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     setup_ook_driver!(tx, None, 8, None).unwrap();
/// }
/// ```
///
/// # Notes
/// - Must be called inside a critical section-aware context (safe in `main()`).
/// - Requires `init_ook_driver!` to have been used earlier.
#[macro_export]
macro_rules! setup_ook_driver {
    ( $tx:expr, $ptt:expr, $tpb:expr, $ptt_inverted:expr $(,)? ) => {
        $crate::timer::global_ook_driver_setup(&OOK_DRIVER, $tx, $ptt, $tpb, $ptt_inverted)
    };
}

/// Calls `tick()` on the global `OOK_DRIVER` if it has been initialized.
///
/// This macro is intended to be invoked from a timer ISR or scheduler to
/// advance the OOK state machine at regular intervals (e.g., every 52.08 µs).
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     tick_ook_timer!();
/// }
/// ```
///
/// # Notes
/// - This macro assumes `OOK_DRIVER` was declared with `init_ook_driver!`
///   and initialized via `setup_ook_driver!`.
/// - Safe to call repeatedly; does nothing if the driver hasn't been set up yet.
#[macro_export]
macro_rules! tick_ook_timer {
    () => {
        $crate::timer::global_ook_timer_tick(&OOK_DRIVER)
    };
}
