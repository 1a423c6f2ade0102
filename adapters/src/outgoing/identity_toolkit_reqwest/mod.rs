pub mod identity_toolkit_adapter;
