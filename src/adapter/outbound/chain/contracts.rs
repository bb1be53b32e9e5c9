//! View and execution bindings for the contracts the adapters query.
//!
//! Calldata for batch steps is built in `domain::calls`; these bindings are
//! for reads and for the Safe's own entry points.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    contract IERC20View {
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }

    #[sol(rpc)]
    contract IConditionalTokensView {
        function isApprovedForAll(address owner, address operator) external view returns (bool);
        function getOutcomeSlotCount(bytes32 conditionId) external view returns (uint256);
    }

    #[sol(rpc)]
    contract IFixedProductMarketMakerView {
        function collateralToken() external view returns (address);
        function conditionIds(uint256 index) external view returns (bytes32);
        function calcBuyAmount(uint256 investmentAmount, uint256 outcomeIndex) external view returns (uint256);
        function calcSellAmount(uint256 returnAmount, uint256 outcomeIndex) external view returns (uint256);
    }

    #[sol(rpc)]
    contract IMarketMakerFactoryView {
        function implementationMaster() external view returns (address);
    }

    /// Payload the deterministic factory forwards to each clone.
    interface ICloneConstructor {
        function cloneConstructor(bytes consData) external;
    }

    #[sol(rpc)]
    contract IRealitioView {
        function balanceOf(address account) external view returns (uint256);
        function getHistoryHash(bytes32 questionId) external view returns (bytes32);

        event LogNewAnswer(
            bytes32 answer,
            bytes32 indexed question_id,
            bytes32 history_hash,
            address indexed user,
            uint256 bond,
            uint256 ts,
            bool is_commitment
        );
    }

    #[sol(rpc)]
    contract ISafe {
        function nonce() external view returns (uint256);
        function getThreshold() external view returns (uint256);
        function getTransactionHash(
            address to,
            uint256 value,
            bytes data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address refundReceiver,
            uint256 _nonce
        ) external view returns (bytes32);
        function execTransaction(
            address to,
            uint256 value,
            bytes data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address payable refundReceiver,
            bytes signatures
        ) external payable returns (bool success);
    }

    interface IMultiSend {
        function multiSend(bytes transactions) external payable;
    }
}
