mod resolve_envelope;

pub use resolve_envelope::ResolveEnvelopeUseCase;
