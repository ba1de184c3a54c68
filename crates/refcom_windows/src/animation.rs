//! Windows Animation Manager handles.

use windows::Win32::System::Com::{CLSCTX_INPROC_SERVER, CoCreateInstance};
use windows::Win32::UI::Animation::*;

use crate::com::{ComHandle, ComHandleExt};
use crate::error::Result;

pub type Manager = ComHandle<IUIAnimationManager2>;
pub type Timer = ComHandle<IUIAnimationTimer>;
pub type TransitionLibrary = ComHandle<IUIAnimationTransitionLibrary2>;
pub type Variable = ComHandle<IUIAnimationVariable2>;
pub type Storyboard = ComHandle<IUIAnimationStoryboard2>;
pub type Transition = ComHandle<IUIAnimationTransition2>;

// All three coclasses need a COM apartment on the calling thread.

pub fn create_manager() -> Result<Manager> {
    // SAFETY: in-process class activation; the object is returned owned.
    let manager: IUIAnimationManager2 =
        unsafe { CoCreateInstance(&UIAnimationManager2, None, CLSCTX_INPROC_SERVER)? };
    tracing::debug!("created animation manager");
    Ok(Manager::from_interface(manager))
}

pub fn create_timer() -> Result<Timer> {
    // SAFETY: as above.
    let timer: IUIAnimationTimer =
        unsafe { CoCreateInstance(&UIAnimationTimer, None, CLSCTX_INPROC_SERVER)? };
    Ok(Timer::from_interface(timer))
}

pub fn create_transition_library() -> Result<TransitionLibrary> {
    // SAFETY: as above.
    let library: IUIAnimationTransitionLibrary2 = unsafe {
        CoCreateInstance(&UIAnimationTransitionLibrary2, None, CLSCTX_INPROC_SERVER)?
    };
    Ok(TransitionLibrary::from_interface(library))
}

pub fn create_variable(manager: &Manager, initial: f64) -> Result<Variable> {
    let manager = manager.require()?;
    // SAFETY: plain COM call on a live interface.
    let variable = unsafe { manager.CreateAnimationVariable(initial)? };
    Ok(Variable::from_interface(variable))
}

pub fn create_storyboard(manager: &Manager) -> Result<Storyboard> {
    let manager = manager.require()?;
    // SAFETY: plain COM call on a live interface.
    let storyboard = unsafe { manager.CreateStoryboard()? };
    Ok(Storyboard::from_interface(storyboard))
}

/// A transition reaching `final_value` at constant speed over `duration`
/// seconds.
pub fn create_linear_transition(
    library: &TransitionLibrary,
    duration: f64,
    final_value: f64,
) -> Result<Transition> {
    let library = library.require()?;
    // SAFETY: plain COM call on a live interface.
    let transition = unsafe { library.CreateLinearTransition(duration, final_value)? };
    Ok(Transition::from_interface(transition))
}
